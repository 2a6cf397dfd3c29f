use std::collections::HashMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{InvestoError, Result};

use super::state::InvestmentState;

pub const STORAGE_KEY: &str = "investo-storage";
pub const STORAGE_VERSION: u32 = 1;

pub trait StateStorage: Send {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedDocument {
    state: InvestmentState,
    #[serde(default)]
    version: u32,
}

/// Reads the persisted state. Missing, unreadable or corrupt data yields the
/// factory defaults.
pub fn load_state(storage: &dyn StateStorage) -> InvestmentState {
    let raw = match storage.read(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("no persisted state, using defaults");
            return InvestmentState::default();
        }
        Err(err) => {
            warn!(error = %err, "failed to read persisted state, using defaults");
            return InvestmentState::default();
        }
    };

    match serde_json::from_str::<PersistedDocument>(&raw) {
        Ok(doc) => {
            let mut state = doc.state;
            state.sanitize();
            debug!(
                version = doc.version,
                scenarios = state.scenarios.len(),
                "loaded persisted state"
            );
            state
        }
        Err(err) => {
            warn!(error = %err, "persisted state is corrupt, using defaults");
            InvestmentState::default()
        }
    }
}

pub fn save_state(storage: &mut dyn StateStorage, state: &InvestmentState) -> Result<()> {
    let doc = PersistedDocument {
        state: state.clone(),
        version: STORAGE_VERSION,
    };
    let json = serde_json::to_string(&doc)?;
    storage.write(STORAGE_KEY, &json)
}

#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStorage for JsonFileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.entries.lock().map_err(|_| {
            InvestoError::Storage(io::Error::other("memory storage lock poisoned"))
        })
    }
}

impl StateStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
