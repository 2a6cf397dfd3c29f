mod calc;
mod engine;
mod rates;
mod solver;
mod types;

pub use calc::{
    MAX_DEDUCTION_PCT, clamp, clamp_pct, compute_future_value_monthly, compute_net_income,
    compute_passive_income, compute_split_amounts, non_negative,
};
pub use engine::{
    MILESTONES, Milestone, MilestoneProgress, MilestoneReport, NextMilestone, RateComparison,
    compare_rate, derive_metrics, goal_milestones, growth_timeline, timeline_breakdown,
};
pub use rates::{
    INFLATION_RATE_PCT, REVERSE_DEFAULT_RATE_PCT, RateCandidate, RateTier, ResolvedRate,
    pick_base_rate, resolve_rate, resolve_reverse_rate,
};
pub use solver::{
    ReverseGoal, ReverseGoalResult, ReverseOutcome, compute_required_monthly_contribution,
    solve_reverse_goal,
};
pub use types::{
    AssetRate, BudgetSplit, DerivedMetrics, GrowthResult, ProjectionInputs, RateSource,
    RequiredContribution, SplitAmounts, SplitKey, TimelinePoint,
};
