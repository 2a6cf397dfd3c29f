use serde::{Deserialize, Serialize};

use crate::core::{
    AssetRate, BudgetSplit, MAX_DEDUCTION_PCT, ProjectionInputs, clamp, non_negative,
};

use super::scenarios::Scenario;
use super::split::is_valid_split;

pub const MIN_HORIZON_YEARS: f64 = 1.0;
pub const MAX_HORIZON_YEARS: f64 = 50.0;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub code: String,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
}

const CATALOGUE: [(&str, &str, &str); 8] = [
    ("USD", "$", "US Dollar"),
    ("EUR", "€", "Euro"),
    ("GBP", "£", "British Pound"),
    ("PHP", "₱", "Philippine Peso"),
    ("JPY", "¥", "Japanese Yen"),
    ("INR", "₹", "Indian Rupee"),
    ("AUD", "A$", "Australian Dollar"),
    ("CAD", "C$", "Canadian Dollar"),
];

impl Currency {
    pub fn catalogue() -> Vec<Currency> {
        CATALOGUE
            .iter()
            .map(|(code, symbol, name)| Currency {
                code: code.to_string(),
                symbol: symbol.to_string(),
                name: name.to_string(),
            })
            .collect()
    }

    pub fn from_code(code: &str) -> Option<Currency> {
        Self::catalogue()
            .into_iter()
            .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
    }

    pub fn usd() -> Currency {
        Currency {
            code: "USD".to_string(),
            symbol: "$".to_string(),
            name: "US Dollar".to_string(),
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::usd()
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioData {
    pub income: f64,
    pub deduction_pct: f64,
    pub split: BudgetSplit,
    pub horizon_years: f64,
    pub manual_rate_pct: Option<f64>,
    pub asset_rate: AssetRate,
    pub lump_sum: f64,
    pub inflation_adjusted: bool,
    pub currency: Currency,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvestmentState {
    pub income: f64,
    pub deduction_pct: f64,
    pub split: BudgetSplit,
    pub horizon_years: f64,
    pub manual_rate_pct: Option<f64>,
    pub asset_rate: AssetRate,
    pub lump_sum: f64,
    pub inflation_adjusted: bool,
    pub currency: Currency,
    pub theme: Theme,
    pub scenarios: Vec<Scenario>,
}

impl Default for InvestmentState {
    fn default() -> Self {
        Self {
            income: 60_000.0,
            deduction_pct: 0.0,
            split: BudgetSplit::DEFAULT,
            horizon_years: 20.0,
            manual_rate_pct: None,
            asset_rate: AssetRate {
                symbol: Some("SPX".to_string()),
                cagr_pct: None,
                source: None,
            },
            lump_sum: 0.0,
            inflation_adjusted: false,
            currency: Currency::default(),
            theme: Theme::default(),
            scenarios: Vec::new(),
        }
    }
}

pub(crate) fn clamp_deduction(value: f64) -> f64 {
    clamp(value, 0.0, MAX_DEDUCTION_PCT)
}

pub(crate) fn clamp_horizon(value: f64) -> f64 {
    clamp(value, MIN_HORIZON_YEARS, MAX_HORIZON_YEARS)
}

impl InvestmentState {
    pub fn projection_inputs(&self) -> ProjectionInputs {
        ProjectionInputs {
            income: self.income,
            deduction_pct: self.deduction_pct,
            split: self.split,
            horizon_years: self.horizon_years,
            manual_rate_pct: self.manual_rate_pct,
            asset_cagr_pct: self.asset_rate.cagr_pct,
            lump_sum: self.lump_sum,
            inflation_adjusted: self.inflation_adjusted,
        }
    }

    pub fn snapshot(&self) -> ScenarioData {
        ScenarioData {
            income: self.income,
            deduction_pct: self.deduction_pct,
            split: self.split,
            horizon_years: self.horizon_years,
            manual_rate_pct: self.manual_rate_pct,
            asset_rate: self.asset_rate.clone(),
            lump_sum: self.lump_sum,
            inflation_adjusted: self.inflation_adjusted,
            currency: self.currency.clone(),
        }
    }

    pub fn apply_snapshot(&mut self, data: &ScenarioData) {
        self.income = data.income;
        self.deduction_pct = data.deduction_pct;
        self.split = data.split;
        self.horizon_years = data.horizon_years;
        self.manual_rate_pct = data.manual_rate_pct;
        self.asset_rate = data.asset_rate.clone();
        self.lump_sum = data.lump_sum;
        self.inflation_adjusted = data.inflation_adjusted;
        self.currency = data.currency.clone();
        self.sanitize();
    }

    pub fn sanitize(&mut self) {
        self.income = non_negative(self.income);
        self.deduction_pct = clamp_deduction(self.deduction_pct);
        self.horizon_years = clamp_horizon(self.horizon_years);
        self.manual_rate_pct = self.manual_rate_pct.map(non_negative);
        self.lump_sum = non_negative(self.lump_sum);
        if !is_valid_split(&self.split) {
            self.split = BudgetSplit::DEFAULT;
        }
    }
}
