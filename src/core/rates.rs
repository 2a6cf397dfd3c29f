use serde::Serialize;

pub const INFLATION_RATE_PCT: f64 = 3.5;

pub const REVERSE_DEFAULT_RATE_PCT: f64 = 8.0;

// Declaration order is precedence order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RateTier {
    Manual,
    Market,
    Default,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RateCandidate {
    pub tier: RateTier,
    pub rate_pct: Option<f64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRate {
    pub tier: RateTier,
    pub base_rate: f64,
    pub inflation_rate: f64,
    pub effective_rate: f64,
}

pub fn pick_base_rate(candidates: &[RateCandidate]) -> Option<(RateTier, f64)> {
    candidates
        .iter()
        .filter_map(|c| c.rate_pct.map(|rate| (c.tier, rate)))
        .min_by_key(|(tier, _)| *tier)
}

fn candidates(
    manual_rate_pct: Option<f64>,
    asset_cagr_pct: Option<f64>,
    default_pct: f64,
) -> [RateCandidate; 3] {
    [
        RateCandidate {
            tier: RateTier::Manual,
            rate_pct: manual_rate_pct,
        },
        RateCandidate {
            tier: RateTier::Market,
            rate_pct: asset_cagr_pct,
        },
        RateCandidate {
            tier: RateTier::Default,
            rate_pct: Some(default_pct),
        },
    ]
}

pub fn resolve_rate(
    manual_rate_pct: Option<f64>,
    asset_cagr_pct: Option<f64>,
    inflation_adjusted: bool,
) -> ResolvedRate {
    let (tier, base_rate) = pick_base_rate(&candidates(manual_rate_pct, asset_cagr_pct, 0.0))
        .unwrap_or((RateTier::Default, 0.0));
    let inflation_rate = if inflation_adjusted {
        INFLATION_RATE_PCT
    } else {
        0.0
    };
    ResolvedRate {
        tier,
        base_rate,
        inflation_rate,
        effective_rate: (base_rate - inflation_rate).max(0.0),
    }
}

pub fn resolve_reverse_rate(manual_rate_pct: Option<f64>, asset_cagr_pct: Option<f64>) -> f64 {
    pick_base_rate(&candidates(
        manual_rate_pct,
        asset_cagr_pct,
        REVERSE_DEFAULT_RATE_PCT,
    ))
    .map(|(_, rate)| rate)
    .unwrap_or(REVERSE_DEFAULT_RATE_PCT)
}
