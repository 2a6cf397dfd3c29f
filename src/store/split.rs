use crate::core::{BudgetSplit, SplitKey, clamp_pct};

// Shares sit on a 1/1024 percent grid, where every sum and difference of
// values in [0, 100] is exact in f64.
const SHARE_GRID: f64 = 1024.0;

fn snap_pct(value: f64) -> f64 {
    (clamp_pct(value) * SHARE_GRID).round() / SHARE_GRID
}

/// Sets one share and rebalances the other two so the three sum to exactly
/// 100. Savings is protected when needs or wants move; needs is protected
/// when savings moves.
pub fn rebalance_split(current: &BudgetSplit, key: SplitKey, value: f64) -> BudgetSplit {
    let value = snap_pct(value);
    let remaining = 100.0 - value;

    match key {
        SplitKey::Needs => {
            let savings_pct = snap_pct(current.savings_pct).min(remaining);
            BudgetSplit {
                needs_pct: value,
                wants_pct: remaining - savings_pct,
                savings_pct,
            }
        }
        SplitKey::Wants => {
            let savings_pct = snap_pct(current.savings_pct).min(remaining);
            BudgetSplit {
                needs_pct: remaining - savings_pct,
                wants_pct: value,
                savings_pct,
            }
        }
        SplitKey::Savings => {
            let needs_pct = snap_pct(current.needs_pct).min(remaining);
            BudgetSplit {
                needs_pct,
                wants_pct: remaining - needs_pct,
                savings_pct: value,
            }
        }
    }
}

pub fn is_valid_split(split: &BudgetSplit) -> bool {
    let shares = [split.needs_pct, split.wants_pct, split.savings_pct];
    shares.iter().all(|s| (0.0..=100.0).contains(s)) && split.total() == 100.0
}
