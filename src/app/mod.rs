#[cfg(feature = "cli")]
pub mod shell;
pub mod views;
