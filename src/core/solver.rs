use serde::Serialize;

use super::calc::is_zero_rate;
use super::types::RequiredContribution;

#[derive(Debug, Clone, Copy)]
pub struct ReverseGoal {
    pub target_amount: f64,
    pub years: f64,
    pub current_savings: f64,
    pub annual_rate_pct: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReverseOutcome {
    Incomplete,
    AlreadyMet,
    Solved,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseGoalResult {
    pub target_amount: f64,
    pub years: f64,
    pub current_savings: f64,
    pub annual_rate_pct: f64,
    pub required: RequiredContribution,
    pub outcome: ReverseOutcome,
    pub message: String,
}

pub fn compute_required_monthly_contribution(
    target_amount: f64,
    annual_rate_pct: f64,
    years: f64,
    current_savings: f64,
) -> RequiredContribution {
    let monthly_rate = annual_rate_pct / 100.0 / 12.0;
    let months = years * 12.0;

    if months <= 0.0 || !months.is_finite() {
        return RequiredContribution {
            monthly: 0.0,
            total_contributions: 0.0,
            interest: 0.0,
        };
    }

    let growth = (1.0 + monthly_rate).powf(months);
    let future_value_of_savings = current_savings * growth;
    let remaining_target = (target_amount - future_value_of_savings).max(0.0);

    if remaining_target <= 0.0 {
        return RequiredContribution {
            monthly: 0.0,
            total_contributions: current_savings,
            interest: target_amount - current_savings,
        };
    }

    let monthly = if is_zero_rate(monthly_rate) {
        remaining_target / months
    } else {
        remaining_target * monthly_rate / (growth - 1.0)
    };
    let total_contributions = monthly * months + current_savings;
    RequiredContribution {
        monthly,
        total_contributions,
        interest: target_amount - total_contributions,
    }
}

pub fn solve_reverse_goal(goal: ReverseGoal) -> ReverseGoalResult {
    let required = compute_required_monthly_contribution(
        goal.target_amount,
        goal.annual_rate_pct,
        goal.years,
        goal.current_savings,
    );

    let (outcome, message) = if goal.target_amount <= 0.0 || goal.years <= 0.0 {
        (
            ReverseOutcome::Incomplete,
            "Enter a target amount and a number of years.".to_string(),
        )
    } else if required.monthly <= 0.0 {
        (
            ReverseOutcome::AlreadyMet,
            "Current savings already reach the target without further contributions.".to_string(),
        )
    } else {
        (
            ReverseOutcome::Solved,
            "Solved required monthly contribution.".to_string(),
        )
    };

    ReverseGoalResult {
        target_amount: goal.target_amount,
        years: goal.years,
        current_savings: goal.current_savings,
        annual_rate_pct: goal.annual_rate_pct,
        required,
        outcome,
        message,
    }
}
