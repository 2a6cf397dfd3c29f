use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackAsset {
    pub symbol: String,
    pub name: String,
    pub cagr_pct: f64,
}

#[derive(Clone, Debug)]
pub struct FallbackTable {
    assets: Vec<FallbackAsset>,
}

impl FallbackTable {
    pub fn new(assets: Vec<FallbackAsset>) -> Self {
        Self { assets }
    }

    pub fn lookup(&self, symbol: &str) -> Option<&FallbackAsset> {
        let symbol = symbol.trim();
        self.assets
            .iter()
            .find(|a| a.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn assets(&self) -> &[FallbackAsset] {
        &self.assets
    }
}

impl Default for FallbackTable {
    fn default() -> Self {
        let entry = |symbol: &str, name: &str, cagr_pct: f64| FallbackAsset {
            symbol: symbol.to_string(),
            name: name.to_string(),
            cagr_pct,
        };
        Self::new(vec![
            entry("SPX", "S&P 500 (10y)", 10.5),
            entry("URTH", "MSCI World ETF (10y)", 9.1),
            entry("PSEi", "PH Index placeholder", 6.5),
            entry("BTC", "Bitcoin capped", 20.0),
            entry("BANK", "Savings account", 2.0),
        ])
    }
}
