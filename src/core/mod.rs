pub mod checkout;
pub mod client;
pub mod session;
pub mod view;

pub use crate::domain::model::{CheckoutOutcome, Service};
pub use crate::domain::ports::{ConfigProvider, MarketplaceApi, Prompter};
pub use crate::utils::error::Result;
