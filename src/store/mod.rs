mod events;
mod persistence;
mod scenarios;
mod split;
mod state;

pub use events::{Listener, StateChange, SubscriptionId};
pub use persistence::{
    JsonFileStorage, MemoryStorage, STORAGE_KEY, STORAGE_VERSION, StateStorage, load_state,
    save_state,
};
pub use scenarios::Scenario;
pub use split::{is_valid_split, rebalance_split};
pub use state::{
    Currency, InvestmentState, MAX_HORIZON_YEARS, MIN_HORIZON_YEARS, ScenarioData, Theme,
};

use tracing::{debug, info, warn};

use crate::core::{
    AssetRate, BudgetSplit, DerivedMetrics, MilestoneReport, RateComparison, ReverseGoal,
    ReverseGoalResult, SplitKey, TimelinePoint, compare_rate, derive_metrics, goal_milestones,
    growth_timeline, non_negative, resolve_reverse_rate, solve_reverse_goal, timeline_breakdown,
};
use crate::errors::Result;

use events::Listeners;
use state::{clamp_deduction, clamp_horizon};

/// Setters clamp, persist the whole state, then notify subscribers. A failed
/// write keeps the in-memory mutation and is returned as `Err`.
pub struct InvestmentStore {
    state: InvestmentState,
    storage: Box<dyn StateStorage>,
    listeners: Listeners,
}

impl InvestmentStore {
    pub fn open(storage: impl StateStorage + 'static) -> Self {
        let state = load_state(&storage);
        Self {
            state,
            storage: Box::new(storage),
            listeners: Listeners::default(),
        }
    }

    pub fn state(&self) -> &InvestmentState {
        &self.state
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.state.scenarios
    }

    pub fn subscribe(
        &mut self,
        listener: impl Fn(StateChange, &InvestmentState) + Send + 'static,
    ) -> SubscriptionId {
        self.listeners.add(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }

    fn commit(&mut self, change: StateChange) -> Result<()> {
        let persisted = save_state(self.storage.as_mut(), &self.state);
        if let Err(err) = &persisted {
            warn!(?change, error = %err, "failed to persist state");
        } else {
            debug!(?change, "state persisted");
        }
        self.listeners.notify(change, &self.state);
        persisted
    }

    pub fn set_income(&mut self, value: f64) -> Result<()> {
        self.state.income = non_negative(value);
        self.commit(StateChange::Income)
    }

    pub fn set_deduction_pct(&mut self, value: f64) -> Result<()> {
        self.state.deduction_pct = clamp_deduction(value);
        self.commit(StateChange::DeductionPct)
    }

    pub fn set_lump_sum(&mut self, value: f64) -> Result<()> {
        self.state.lump_sum = non_negative(value);
        self.commit(StateChange::LumpSum)
    }

    pub fn set_horizon_years(&mut self, value: f64) -> Result<()> {
        self.state.horizon_years = clamp_horizon(value);
        self.commit(StateChange::HorizonYears)
    }

    pub fn set_manual_rate_pct(&mut self, value: Option<f64>) -> Result<()> {
        self.state.manual_rate_pct = value.map(non_negative);
        self.commit(StateChange::ManualRate)
    }

    pub fn set_inflation_adjusted(&mut self, value: bool) -> Result<()> {
        self.state.inflation_adjusted = value;
        self.commit(StateChange::InflationAdjusted)
    }

    pub fn set_asset_rate(&mut self, value: AssetRate) -> Result<()> {
        self.state.asset_rate = value;
        self.commit(StateChange::AssetRate)
    }

    pub fn set_currency(&mut self, value: Currency) -> Result<()> {
        self.state.currency = value;
        self.commit(StateChange::Currency)
    }

    pub fn set_theme(&mut self, value: Theme) -> Result<()> {
        self.state.theme = value;
        self.commit(StateChange::Theme)
    }

    pub fn set_split(&mut self, key: SplitKey, value: f64) -> Result<()> {
        self.state.split = rebalance_split(&self.state.split, key, value);
        self.commit(StateChange::Split)
    }

    pub fn reset_split(&mut self) -> Result<()> {
        self.state.split = BudgetSplit::DEFAULT;
        self.commit(StateChange::Split)
    }

    pub fn derived(&self) -> DerivedMetrics {
        derive_metrics(&self.state.projection_inputs())
    }

    pub fn growth_timeline(&self, comparison_rate_pct: Option<f64>) -> Vec<TimelinePoint> {
        growth_timeline(&self.state.projection_inputs(), comparison_rate_pct)
    }

    pub fn timeline_breakdown(&self) -> Vec<TimelinePoint> {
        timeline_breakdown(&self.state.projection_inputs())
    }

    pub fn compare_rate(&self, comparison_rate_pct: f64) -> RateComparison {
        compare_rate(&self.state.projection_inputs(), comparison_rate_pct)
    }

    pub fn milestones(&self) -> MilestoneReport {
        goal_milestones(self.derived().growth.future_value)
    }

    pub fn reverse_goal(
        &self,
        target_amount: f64,
        years: f64,
        current_savings: f64,
        rate_pct: Option<f64>,
    ) -> ReverseGoalResult {
        let annual_rate_pct = rate_pct.unwrap_or_else(|| {
            resolve_reverse_rate(self.state.manual_rate_pct, self.state.asset_rate.cagr_pct)
        });
        solve_reverse_goal(ReverseGoal {
            target_amount,
            years,
            current_savings,
            annual_rate_pct,
        })
    }

    // A failed write rolls the new scenario back.
    pub fn save_scenario(&mut self, name: &str) -> Result<Scenario> {
        let data = self.state.snapshot();
        let scenario = scenarios::save(&mut self.state.scenarios, name, data)?;
        if let Err(err) = save_state(self.storage.as_mut(), &self.state) {
            self.state.scenarios.pop();
            warn!(name = %scenario.name, error = %err, "scenario not saved");
            return Err(err);
        }
        info!(id = %scenario.id, name = %scenario.name, "scenario saved");
        self.listeners.notify(StateChange::ScenarioSaved, &self.state);
        Ok(scenario)
    }

    pub fn load_scenario(&mut self, id: &str) -> Result<()> {
        let data = scenarios::find(&self.state.scenarios, id)?.data.clone();
        self.state.apply_snapshot(&data);
        info!(id, "scenario loaded");
        self.commit(StateChange::ScenarioLoaded)
    }

    pub fn rename_scenario(&mut self, id: &str, new_name: &str) -> Result<()> {
        scenarios::rename(&mut self.state.scenarios, id, new_name)?;
        info!(id, "scenario renamed");
        self.commit(StateChange::ScenarioRenamed)
    }

    pub fn delete_scenario(&mut self, id: &str) -> Result<()> {
        let removed = scenarios::remove(&mut self.state.scenarios, id)?;
        info!(id, name = %removed.name, "scenario deleted");
        self.commit(StateChange::ScenarioDeleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RateSource;
    use crate::errors::InvestoError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    fn open_memory() -> (InvestmentStore, MemoryStorage) {
        let storage = MemoryStorage::new();
        (InvestmentStore::open(storage.clone()), storage)
    }

    #[test]
    fn setters_clamp_inputs() {
        let (mut store, _) = open_memory();
        store.set_income(-5.0).expect("persisted");
        assert_eq!(store.state().income, 0.0);
        store.set_horizon_years(999.0).expect("persisted");
        assert_eq!(store.state().horizon_years, 50.0);
        store.set_horizon_years(0.0).expect("persisted");
        assert_eq!(store.state().horizon_years, 1.0);
        store.set_deduction_pct(75.0).expect("persisted");
        assert_eq!(store.state().deduction_pct, 60.0);
        store.set_lump_sum(-1.0).expect("persisted");
        assert_eq!(store.state().lump_sum, 0.0);
        store.set_manual_rate_pct(Some(-2.0)).expect("persisted");
        assert_eq!(store.state().manual_rate_pct, Some(0.0));
        store.set_manual_rate_pct(None).expect("persisted");
        assert_eq!(store.state().manual_rate_pct, None);
    }

    #[test]
    fn split_setter_rebalances_and_reset_restores_default() {
        let (mut store, _) = open_memory();
        store.set_split(SplitKey::Needs, 70.0).expect("persisted");
        assert_eq!(store.state().split.total(), 100.0);
        assert_eq!(store.state().split.savings_pct, 20.0);
        store.reset_split().expect("persisted");
        assert_eq!(store.state().split, BudgetSplit::DEFAULT);
    }

    #[test]
    fn mutations_are_written_through_and_reloaded() {
        let (mut store, storage) = open_memory();
        store.set_income(7_500.0).expect("persisted");
        store.set_theme(Theme::Light).expect("persisted");
        store.set_split(SplitKey::Savings, 35.0).expect("persisted");

        let reopened = InvestmentStore::open(storage);
        assert_eq!(reopened.state(), store.state());
        assert_eq!(reopened.state().income, 7_500.0);
        assert_eq!(reopened.state().theme, Theme::Light);
    }

    #[test]
    fn derived_metrics_use_resolved_rate() {
        let (mut store, _) = open_memory();
        store
            .set_asset_rate(AssetRate {
                symbol: Some("SPX".to_string()),
                cagr_pct: Some(10.0),
                source: Some(RateSource::Api),
            })
            .expect("persisted");
        store.set_inflation_adjusted(true).expect("persisted");
        assert_eq!(store.derived().effective_rate, 6.5);

        store.set_manual_rate_pct(Some(5.0)).expect("persisted");
        store.set_inflation_adjusted(false).expect("persisted");
        assert_eq!(store.derived().effective_rate, 5.0);
        assert_eq!(store.derived(), store.derived());
    }

    #[test]
    fn scenario_round_trip_restores_inputs() {
        let (mut store, _) = open_memory();
        store.set_income(4_000.0).expect("persisted");
        let saved = store.save_scenario("A").expect("saved");

        store.set_income(9_999.0).expect("persisted");
        store.load_scenario(&saved.id).expect("loaded");

        assert_eq!(store.state().income, 4_000.0);
        assert_eq!(store.scenarios().len(), 1);
        assert_eq!(store.scenarios()[0].name, "A");
        assert_eq!(store.scenarios()[0].data.income, 4_000.0);
    }

    #[test]
    fn scenario_copy_is_independent_of_later_mutation() {
        let (mut store, _) = open_memory();
        let saved = store.save_scenario("Baseline").expect("saved");
        store.set_split(SplitKey::Wants, 50.0).expect("persisted");
        store
            .set_asset_rate(AssetRate {
                symbol: Some("BTC".to_string()),
                cagr_pct: Some(20.0),
                source: Some(RateSource::Fallback),
            })
            .expect("persisted");
        assert_eq!(store.scenarios()[0].data, saved.data);
        assert_eq!(store.scenarios()[0].data.split, BudgetSplit::DEFAULT);
    }

    #[test]
    fn scenario_errors_leave_state_untouched() {
        let (mut store, _) = open_memory();
        let before = store.state().clone();
        assert!(matches!(
            store.save_scenario("  "),
            Err(InvestoError::BlankScenarioName)
        ));
        assert!(matches!(
            store.load_scenario("nope"),
            Err(InvestoError::ScenarioNotFound(_))
        ));
        assert!(matches!(
            store.delete_scenario("nope"),
            Err(InvestoError::ScenarioNotFound(_))
        ));
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn scenarios_persist_with_state() {
        let (mut store, storage) = open_memory();
        let a = store.save_scenario("A").expect("saved");
        let b = store.save_scenario("B").expect("saved");
        store.rename_scenario(&a.id, "Renamed").expect("renamed");
        store.delete_scenario(&b.id).expect("deleted");

        let reopened = InvestmentStore::open(storage);
        let names: Vec<&str> = reopened.scenarios().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Renamed"]);
    }

    #[test]
    fn subscribers_are_notified_until_unsubscribed() {
        let (mut store, _) = open_memory();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = store.subscribe(move |change, state| {
            sink.lock().expect("lock").push((change, state.income));
        });

        store.set_income(100.0).expect("persisted");
        store.reset_split().expect("persisted");
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set_income(200.0).expect("persisted");

        let seen = seen.lock().expect("lock");
        assert_eq!(
            *seen,
            vec![(StateChange::Income, 100.0), (StateChange::Split, 100.0)]
        );
    }

    #[derive(Clone, Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        failing: Arc<AtomicBool>,
    }

    impl StateStorage for FlakyStorage {
        fn read(&self, key: &str) -> Result<Option<String>> {
            self.inner.read(key)
        }

        fn write(&mut self, key: &str, value: &str) -> Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(InvestoError::Storage(std::io::Error::other("disk full")));
            }
            self.inner.write(key, value)
        }
    }

    #[test]
    fn failed_setter_write_keeps_the_new_value() {
        let storage = FlakyStorage::default();
        let mut store = InvestmentStore::open(storage.clone());
        storage.failing.store(true, Ordering::SeqCst);

        assert!(matches!(
            store.set_income(5_000.0),
            Err(InvestoError::Storage(_))
        ));
        assert_eq!(store.state().income, 5_000.0);
    }

    #[test]
    fn failed_scenario_save_rolls_back() {
        let storage = FlakyStorage::default();
        let mut store = InvestmentStore::open(storage.clone());
        let saved = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&saved);
        store.subscribe(move |change, _| {
            if change == StateChange::ScenarioSaved {
                *sink.lock().expect("lock") += 1;
            }
        });

        storage.failing.store(true, Ordering::SeqCst);
        assert!(matches!(
            store.save_scenario("A"),
            Err(InvestoError::Storage(_))
        ));
        assert!(store.scenarios().is_empty());
        assert_eq!(*saved.lock().expect("lock"), 0);

        storage.failing.store(false, Ordering::SeqCst);
        let a = store.save_scenario("A").expect("saved");
        assert_eq!(store.scenarios().len(), 1);
        assert_eq!(store.scenarios()[0].id, a.id);
        assert_eq!(*saved.lock().expect("lock"), 1);
        assert_eq!(InvestmentStore::open(storage).scenarios().len(), 1);
    }

    #[test]
    fn reverse_goal_falls_back_to_planning_rate() {
        let (store, _) = open_memory();
        let result = store.reverse_goal(100_000.0, 10.0, 0.0, None);
        assert_eq!(result.annual_rate_pct, 8.0);
        let explicit = store.reverse_goal(100_000.0, 10.0, 0.0, Some(3.0));
        assert_eq!(explicit.annual_rate_pct, 3.0);
        assert!(explicit.required.monthly > result.required.monthly);
    }
}
