pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(test)]
mod testing;

#[cfg(feature = "cli")]
pub use app::shell::App;
#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::TomlConfig;
pub use core::{
    checkout::CheckoutFlow,
    client::HttpMarketplaceApi,
    session::Session,
    view::{View, ViewEngine},
};
pub use domain::model::CheckoutOutcome;
pub use utils::error::{MarketError, Result};
