use serde::Serialize;

use super::state::InvestmentState;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StateChange {
    Income,
    DeductionPct,
    Split,
    HorizonYears,
    ManualRate,
    AssetRate,
    LumpSum,
    InflationAdjusted,
    Currency,
    Theme,
    ScenarioSaved,
    ScenarioLoaded,
    ScenarioRenamed,
    ScenarioDeleted,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SubscriptionId(u64);

pub type Listener = Box<dyn Fn(StateChange, &InvestmentState) + Send>;

#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| *existing != id);
        self.entries.len() != before
    }

    pub(crate) fn notify(&self, change: StateChange, state: &InvestmentState) {
        for (_, listener) in &self.entries {
            listener(change, state);
        }
    }
}
