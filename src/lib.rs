pub mod api;
pub mod config;
pub mod core;
pub mod errors;
pub mod format;
pub mod logging;
pub mod market;
pub mod store;

pub use errors::{InvestoError, Result};
pub use store::InvestmentStore;
