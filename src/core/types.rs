use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSplit {
    pub needs_pct: f64,
    pub wants_pct: f64,
    pub savings_pct: f64,
}

impl BudgetSplit {
    pub const DEFAULT: BudgetSplit = BudgetSplit {
        needs_pct: 50.0,
        wants_pct: 30.0,
        savings_pct: 20.0,
    };

    pub fn total(&self) -> f64 {
        self.needs_pct + self.wants_pct + self.savings_pct
    }

    pub fn get(&self, key: SplitKey) -> f64 {
        match key {
            SplitKey::Needs => self.needs_pct,
            SplitKey::Wants => self.wants_pct,
            SplitKey::Savings => self.savings_pct,
        }
    }
}

impl Default for BudgetSplit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitKey {
    #[serde(alias = "needsPct", alias = "needs_pct")]
    Needs,
    #[serde(alias = "wantsPct", alias = "wants_pct")]
    Wants,
    #[serde(alias = "savingsPct", alias = "savings_pct")]
    Savings,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    Api,
    Fallback,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssetRate {
    pub symbol: Option<String>,
    pub cagr_pct: Option<f64>,
    pub source: Option<RateSource>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectionInputs {
    pub income: f64,
    pub deduction_pct: f64,
    pub split: BudgetSplit,
    pub horizon_years: f64,
    pub manual_rate_pct: Option<f64>,
    pub asset_cagr_pct: Option<f64>,
    pub lump_sum: f64,
    pub inflation_adjusted: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitAmounts {
    pub needs: f64,
    pub wants: f64,
    pub savings: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthResult {
    pub future_value: f64,
    pub principal: f64,
    pub interest: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredContribution {
    pub monthly: f64,
    pub total_contributions: f64,
    pub interest: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    pub net_income: f64,
    pub split_amounts: SplitAmounts,
    pub savings_monthly: f64,
    pub base_rate: f64,
    pub inflation_rate: f64,
    pub effective_rate: f64,
    pub growth: GrowthResult,
    pub passive_income: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    pub year: f64,
    pub future_value: f64,
    pub principal: f64,
    pub interest: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_value: Option<f64>,
}
