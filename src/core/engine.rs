use serde::Serialize;

use super::calc::{
    compute_future_value_monthly, compute_net_income, compute_passive_income,
    compute_split_amounts, non_negative,
};
use super::rates::{ResolvedRate, resolve_rate};
use super::types::{DerivedMetrics, GrowthResult, ProjectionInputs, SplitAmounts, TimelinePoint};

const MAX_CHART_POINTS: f64 = 20.0;
const BREAKDOWN_YEARS: [f64; 8] = [5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 40.0, 50.0];

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub threshold: f64,
    pub title: &'static str,
    pub description: &'static str,
}

pub const MILESTONES: [Milestone; 9] = [
    Milestone {
        threshold: 50_000.0,
        title: "Emergency Fund Secure",
        description: "6 months of expenses covered",
    },
    Milestone {
        threshold: 100_000.0,
        title: "Six Figures",
        description: "First major milestone",
    },
    Milestone {
        threshold: 500_000.0,
        title: "Half Million",
        description: "Serious wealth building",
    },
    Milestone {
        threshold: 1_000_000.0,
        title: "First Car",
        description: "Enough for a solid vehicle",
    },
    Milestone {
        threshold: 2_000_000.0,
        title: "Travel Fund",
        description: "Dream vacation unlocked",
    },
    Milestone {
        threshold: 5_000_000.0,
        title: "House Downpayment",
        description: "20% on a starter home",
    },
    Milestone {
        threshold: 10_000_000.0,
        title: "Eight Figures",
        description: "Major wealth milestone",
    },
    Milestone {
        threshold: 20_000_000.0,
        title: "Financial Freedom",
        description: "Passive income sustains lifestyle",
    },
    Milestone {
        threshold: 50_000_000.0,
        title: "Generational Wealth",
        description: "Legacy secured",
    },
];

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneProgress {
    #[serde(flatten)]
    pub milestone: Milestone,
    pub achieved: bool,
    pub progress_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneReport {
    pub current_value: f64,
    pub milestones: Vec<MilestoneProgress>,
    pub achieved_count: usize,
    pub next: Option<NextMilestone>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextMilestone {
    pub title: &'static str,
    pub threshold: f64,
    pub remaining: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateComparison {
    pub main_rate: f64,
    pub comparison_rate: f64,
    pub main: GrowthResult,
    pub comparison: GrowthResult,
    pub difference: f64,
}

struct Contribution {
    net_income: f64,
    split_amounts: SplitAmounts,
    savings_monthly: f64,
    rate: ResolvedRate,
}

fn contribution(inputs: &ProjectionInputs) -> Contribution {
    let net_income = compute_net_income(inputs.income, inputs.deduction_pct);
    let split_amounts = compute_split_amounts(net_income, &inputs.split);
    let rate = resolve_rate(
        inputs.manual_rate_pct,
        inputs.asset_cagr_pct,
        inputs.inflation_adjusted,
    );
    Contribution {
        net_income,
        split_amounts,
        savings_monthly: split_amounts.savings,
        rate,
    }
}

pub fn derive_metrics(inputs: &ProjectionInputs) -> DerivedMetrics {
    let c = contribution(inputs);
    let effective_rate = c.rate.effective_rate;
    let growth = compute_future_value_monthly(
        c.savings_monthly,
        effective_rate,
        inputs.horizon_years,
        inputs.lump_sum,
    );
    DerivedMetrics {
        net_income: c.net_income,
        split_amounts: c.split_amounts,
        savings_monthly: c.savings_monthly,
        base_rate: c.rate.base_rate,
        inflation_rate: c.rate.inflation_rate,
        effective_rate,
        growth,
        passive_income: compute_passive_income(growth.future_value, effective_rate),
    }
}

fn point_at(
    c: &Contribution,
    lump_sum: f64,
    year: f64,
    comparison_rate_pct: Option<f64>,
) -> TimelinePoint {
    let growth =
        compute_future_value_monthly(c.savings_monthly, c.rate.effective_rate, year, lump_sum);
    TimelinePoint {
        year,
        future_value: growth.future_value,
        principal: growth.principal,
        interest: growth.interest,
        comparison_value: comparison_rate_pct.map(|rate| {
            compute_future_value_monthly(c.savings_monthly, rate, year, lump_sum).future_value
        }),
    }
}

pub fn growth_timeline(
    inputs: &ProjectionInputs,
    comparison_rate_pct: Option<f64>,
) -> Vec<TimelinePoint> {
    let c = contribution(inputs);
    let comparison_rate_pct = comparison_rate_pct.map(non_negative);
    let horizon = inputs.horizon_years.max(0.0);
    let step = if horizon > MAX_CHART_POINTS {
        (horizon / MAX_CHART_POINTS).ceil()
    } else {
        1.0
    };

    let mut points = Vec::new();
    let mut year = 0.0;
    while year <= horizon {
        points.push(point_at(&c, inputs.lump_sum, year, comparison_rate_pct));
        year += step;
    }
    points
}

pub fn timeline_breakdown(inputs: &ProjectionInputs) -> Vec<TimelinePoint> {
    let c = contribution(inputs);
    let horizon = inputs.horizon_years;
    let mut years: Vec<f64> = BREAKDOWN_YEARS
        .iter()
        .copied()
        .filter(|y| *y <= horizon)
        .collect();
    if !years.contains(&horizon) {
        years.push(horizon);
    }
    years.sort_by(|a, b| a.total_cmp(b));

    years
        .into_iter()
        .map(|year| point_at(&c, inputs.lump_sum, year, None))
        .collect()
}

pub fn compare_rate(inputs: &ProjectionInputs, comparison_rate_pct: f64) -> RateComparison {
    let comparison_rate_pct = non_negative(comparison_rate_pct);
    let c = contribution(inputs);
    let main = compute_future_value_monthly(
        c.savings_monthly,
        c.rate.effective_rate,
        inputs.horizon_years,
        inputs.lump_sum,
    );
    let comparison = compute_future_value_monthly(
        c.savings_monthly,
        comparison_rate_pct,
        inputs.horizon_years,
        inputs.lump_sum,
    );
    RateComparison {
        main_rate: c.rate.effective_rate,
        comparison_rate: comparison_rate_pct,
        main,
        comparison,
        difference: main.future_value - comparison.future_value,
    }
}

pub fn goal_milestones(current_value: f64) -> MilestoneReport {
    let milestones: Vec<MilestoneProgress> = MILESTONES
        .iter()
        .map(|m| MilestoneProgress {
            milestone: *m,
            achieved: current_value >= m.threshold,
            progress_pct: (current_value / m.threshold * 100.0).clamp(0.0, 100.0),
        })
        .collect();
    let achieved_count = milestones.iter().filter(|m| m.achieved).count();
    let next = MILESTONES
        .iter()
        .find(|m| current_value < m.threshold)
        .map(|m| NextMilestone {
            title: m.title,
            threshold: m.threshold,
            remaining: m.threshold - current_value,
        });

    MilestoneReport {
        current_value,
        milestones,
        achieved_count,
        next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BudgetSplit;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_inputs() -> ProjectionInputs {
        ProjectionInputs {
            income: 60_000.0,
            deduction_pct: 0.0,
            split: BudgetSplit::DEFAULT,
            horizon_years: 20.0,
            manual_rate_pct: Some(8.0),
            asset_cagr_pct: None,
            lump_sum: 0.0,
            inflation_adjusted: false,
        }
    }

    #[test]
    fn derive_metrics_end_to_end_fixture() {
        let derived = derive_metrics(&sample_inputs());
        assert_approx(derived.net_income, 60_000.0);
        assert_approx(derived.savings_monthly, 12_000.0);
        assert_approx(derived.split_amounts.needs, 30_000.0);
        assert_approx(derived.split_amounts.wants, 18_000.0);
        assert_eq!(derived.effective_rate, 8.0);
        assert!((derived.growth.future_value - 7_068_244.987_457_458).abs() < 1e-4);
        assert_approx(
            derived.passive_income,
            derived.growth.future_value * 0.08 / 12.0,
        );
    }

    #[test]
    fn derive_metrics_is_bit_identical_across_calls() {
        let inputs = ProjectionInputs {
            deduction_pct: 17.5,
            lump_sum: 12_345.0,
            inflation_adjusted: true,
            manual_rate_pct: None,
            asset_cagr_pct: Some(9.1),
            ..sample_inputs()
        };
        let a = derive_metrics(&inputs);
        let b = derive_metrics(&inputs);
        assert_eq!(a.growth.future_value.to_bits(), b.growth.future_value.to_bits());
        assert_eq!(a.passive_income.to_bits(), b.passive_income.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn inflation_adjustment_lowers_effective_rate() {
        let inputs = ProjectionInputs {
            manual_rate_pct: None,
            asset_cagr_pct: Some(10.0),
            inflation_adjusted: true,
            ..sample_inputs()
        };
        let derived = derive_metrics(&inputs);
        assert_eq!(derived.base_rate, 10.0);
        assert_eq!(derived.inflation_rate, 3.5);
        assert_eq!(derived.effective_rate, 6.5);
    }

    #[test]
    fn growth_timeline_samples_every_year_for_short_horizons() {
        let inputs = ProjectionInputs {
            horizon_years: 10.0,
            ..sample_inputs()
        };
        let points = growth_timeline(&inputs, None);
        assert_eq!(points.len(), 11);
        assert_eq!(points[0].year, 0.0);
        assert_eq!(points[0].future_value, 0.0);
        let last = points.last().expect("timeline has points");
        assert_eq!(last.year, 10.0);
        let derived = derive_metrics(&inputs);
        assert_eq!(last.future_value, derived.growth.future_value);
    }

    #[test]
    fn growth_timeline_thins_long_horizons() {
        let inputs = ProjectionInputs {
            horizon_years: 50.0,
            ..sample_inputs()
        };
        let points = growth_timeline(&inputs, Some(4.0));
        let years: Vec<f64> = points.iter().map(|p| p.year).collect();
        assert_eq!(years.first(), Some(&0.0));
        assert_eq!(years.last(), Some(&48.0));
        assert_eq!(years.len(), 17);
        assert!(points.iter().all(|p| p.comparison_value.is_some()));
    }

    #[test]
    fn timeline_breakdown_appends_horizon() {
        let inputs = ProjectionInputs {
            horizon_years: 22.0,
            ..sample_inputs()
        };
        let years: Vec<f64> = timeline_breakdown(&inputs).iter().map(|p| p.year).collect();
        assert_eq!(years, vec![5.0, 10.0, 15.0, 20.0, 22.0]);

        let inputs = ProjectionInputs {
            horizon_years: 3.0,
            ..sample_inputs()
        };
        let years: Vec<f64> = timeline_breakdown(&inputs).iter().map(|p| p.year).collect();
        assert_eq!(years, vec![3.0]);
    }

    #[test]
    fn compare_rate_reports_difference() {
        let comparison = compare_rate(&sample_inputs(), 4.0);
        assert_eq!(comparison.main_rate, 8.0);
        assert!(comparison.difference > 0.0);
        assert_approx(
            comparison.difference,
            comparison.main.future_value - comparison.comparison.future_value,
        );
    }

    #[test]
    fn negative_comparison_rates_clamp_to_zero() {
        let inputs = sample_inputs();
        let flat = compute_future_value_monthly(12_000.0, 0.0, 20.0, 0.0).future_value;

        let comparison = compare_rate(&inputs, -1_500.0);
        assert_eq!(comparison.comparison_rate, 0.0);
        assert_eq!(comparison.comparison.future_value, flat);

        let points = growth_timeline(&inputs, Some(-1_200.0));
        let last = points.last().expect("timeline has points");
        assert_eq!(last.comparison_value, Some(flat));
        assert!(
            points
                .iter()
                .all(|p| p.comparison_value.is_some_and(f64::is_finite))
        );
    }

    #[test]
    fn goal_milestones_track_progress() {
        let report = goal_milestones(750_000.0);
        assert_eq!(report.achieved_count, 3);
        let next = report.next.expect("next milestone");
        assert_eq!(next.title, "First Car");
        assert_approx(next.remaining, 250_000.0);
        assert_approx(report.milestones[3].progress_pct, 75.0);
        assert_eq!(report.milestones[0].progress_pct, 100.0);

        let all = goal_milestones(60_000_000.0);
        assert_eq!(all.achieved_count, MILESTONES.len());
        assert!(all.next.is_none());
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_timeline_is_monotonic_for_non_negative_rates(
            income in 0u32..200_000,
            horizon in 1u32..51,
            rate_bp in 0u32..2_000,
            lump_sum in 0u32..100_000
        ) {
            let inputs = ProjectionInputs {
                income: income as f64,
                horizon_years: horizon as f64,
                manual_rate_pct: Some(rate_bp as f64 / 100.0),
                lump_sum: lump_sum as f64,
                ..sample_inputs()
            };
            let points = growth_timeline(&inputs, None);
            prop_assert!(points.len() <= 21);
            prop_assert_eq!(points[0].future_value, lump_sum as f64);
            for pair in points.windows(2) {
                prop_assert!(pair[1].future_value + 1e-9 >= pair[0].future_value);
            }
        }
    }
}
