use thiserror::Error;

use crate::market::MarketDataError;

#[derive(Error, Debug)]
pub enum InvestoError {
    #[error("Scenario name must not be blank")]
    BlankScenarioName,
    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Market data error: {0}")]
    Market(#[from] MarketDataError),
}

pub type Result<T> = std::result::Result<T, InvestoError>;
