//! Consumption side of the market-data collaborator. The live client lives
//! outside this crate; it only has to implement [`CagrProvider`].

mod cagr;
mod fallback;

pub use cagr::{CagrStats, PricePoint, cagr_from_series};
pub use fallback::{FallbackAsset, FallbackTable};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::core::{AssetRate, RateSource};

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),
    #[error("Symbol not found: {0}")]
    NotFound(String),
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
    #[error("Provider error: {0}")]
    Provider(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CagrQuote {
    pub symbol: String,
    pub cagr_pct: f64,
    pub years_used: f64,
    pub samples: usize,
    pub source: RateSource,
}

#[async_trait]
pub trait CagrProvider: Send + Sync {
    async fn fetch_cagr(&self, symbol: &str) -> Result<CagrQuote, MarketDataError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineProvider;

#[async_trait]
impl CagrProvider for OfflineProvider {
    async fn fetch_cagr(&self, symbol: &str) -> Result<CagrQuote, MarketDataError> {
        Err(MarketDataError::Unavailable(format!(
            "no market data client configured for {symbol}"
        )))
    }
}

/// Asks the provider for `symbol`'s growth rate and falls back to the static
/// table when it fails. An unknown symbol with no table entry keeps the symbol
/// and leaves the rate empty, which projections read as 0%.
pub async fn resolve_asset_rate(
    provider: &dyn CagrProvider,
    table: &FallbackTable,
    symbol: &str,
) -> AssetRate {
    match provider.fetch_cagr(symbol).await {
        Ok(quote) => {
            info!(symbol = %quote.symbol, cagr_pct = quote.cagr_pct, "resolved market rate");
            AssetRate {
                symbol: Some(quote.symbol),
                cagr_pct: Some(quote.cagr_pct),
                source: Some(RateSource::Api),
            }
        }
        Err(err) => match table.lookup(symbol) {
            Some(asset) => {
                warn!(symbol, error = %err, cagr_pct = asset.cagr_pct, "using fallback rate");
                AssetRate {
                    symbol: Some(asset.symbol.clone()),
                    cagr_pct: Some(asset.cagr_pct),
                    source: Some(RateSource::Fallback),
                }
            }
            None => {
                warn!(symbol, error = %err, "no market or fallback rate");
                AssetRate {
                    symbol: Some(symbol.to_string()),
                    cagr_pct: None,
                    source: None,
                }
            }
        },
    }
}
