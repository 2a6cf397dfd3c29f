use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{InvestoError, Result};

use super::state::ScenarioData;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub data: ScenarioData,
}

fn normalize_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(InvestoError::BlankScenarioName);
    }
    Ok(trimmed.to_string())
}

fn position(scenarios: &[Scenario], id: &str) -> Result<usize> {
    scenarios
        .iter()
        .position(|s| s.id == id)
        .ok_or_else(|| InvestoError::ScenarioNotFound(id.to_string()))
}

pub fn find<'a>(scenarios: &'a [Scenario], id: &str) -> Result<&'a Scenario> {
    position(scenarios, id).map(|idx| &scenarios[idx])
}

pub fn save(scenarios: &mut Vec<Scenario>, name: &str, data: ScenarioData) -> Result<Scenario> {
    let scenario = Scenario {
        id: Uuid::new_v4().to_string(),
        name: normalize_name(name)?,
        created_at: Utc::now(),
        data,
    };
    scenarios.push(scenario.clone());
    Ok(scenario)
}

pub fn rename(scenarios: &mut [Scenario], id: &str, new_name: &str) -> Result<()> {
    let name = normalize_name(new_name)?;
    let idx = position(scenarios, id)?;
    scenarios[idx].name = name;
    Ok(())
}

pub fn remove(scenarios: &mut Vec<Scenario>, id: &str) -> Result<Scenario> {
    let idx = position(scenarios, id)?;
    Ok(scenarios.remove(idx))
}
