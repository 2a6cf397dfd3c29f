use super::types::{BudgetSplit, GrowthResult, SplitAmounts};

pub const MAX_DEDUCTION_PCT: f64 = 60.0;

const ZERO_RATE_EPS: f64 = 1e-9;

// Unlike `f64::clamp` this never panics; NaN maps to `lo`.
pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

pub fn clamp_pct(value: f64) -> f64 {
    clamp(value, 0.0, 100.0)
}

pub fn non_negative(value: f64) -> f64 {
    value.max(0.0)
}

pub fn compute_net_income(income: f64, deduction_pct: f64) -> f64 {
    let income = income.max(0.0);
    let pct = clamp(deduction_pct, 0.0, MAX_DEDUCTION_PCT);
    income * (1.0 - pct / 100.0)
}

pub fn compute_split_amounts(net_income: f64, split: &BudgetSplit) -> SplitAmounts {
    SplitAmounts {
        needs: net_income * split.needs_pct / 100.0,
        wants: net_income * split.wants_pct / 100.0,
        savings: net_income * split.savings_pct / 100.0,
    }
}

pub fn compute_future_value_monthly(
    contribution_monthly: f64,
    annual_rate_pct: f64,
    years: f64,
    lump_sum: f64,
) -> GrowthResult {
    let contribution = contribution_monthly.max(0.0);
    let lump_sum = lump_sum.max(0.0);
    let monthly_rate = annual_rate_pct / 100.0 / 12.0;
    let months = (years.max(0.0) * 12.0).round();

    if months == 0.0 {
        return GrowthResult {
            future_value: lump_sum,
            principal: lump_sum,
            interest: 0.0,
        };
    }

    let principal = lump_sum + contribution * months;
    if monthly_rate.abs() < ZERO_RATE_EPS {
        return GrowthResult {
            future_value: principal,
            principal,
            interest: 0.0,
        };
    }

    let growth = (1.0 + monthly_rate).powf(months);
    let future_value = lump_sum * growth + contribution * (growth - 1.0) / monthly_rate;
    GrowthResult {
        future_value,
        principal,
        interest: future_value - principal,
    }
}

pub fn compute_passive_income(future_value: f64, annual_rate_pct: f64) -> f64 {
    future_value * (annual_rate_pct / 100.0) / 12.0
}

pub(crate) fn is_zero_rate(monthly_rate: f64) -> bool {
    monthly_rate.abs() < ZERO_RATE_EPS
}
