//! The legacy in-memory pattern store, kept bug-for-bug faithful.
//!
//! States are `open` / `accepted` / `muted`; every invalid move raises
//! `InvalidStateTransition`, including re-accepting an accepted record —
//! the adapter smooths that edge for unified callers.

use std::sync::{Mutex, RwLock};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Legacy record shape. `extras` carries everything the legacy schema never
/// modeled, as an opaque JSON blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyRecord {
    pub pattern_id: String,
    pub kind: String,
    pub label: String,
    pub score: f64,
    /// "open" | "accepted" | "muted".
    pub state: String,
    pub sites: Vec<LegacySite>,
    #[serde(default)]
    pub extras: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacySite {
    pub path: String,
    pub line: u32,
}

/// Errors in the legacy layer's own vocabulary.
#[derive(Debug, thiserror::Error)]
pub enum LegacyStoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("duplicate record: {0}")]
    Duplicate(String),

    #[error("invalid state transition for {pattern_id}: {from} -> {to}")]
    InvalidStateTransition {
        pattern_id: String,
        from: String,
        to: String,
    },
}

/// What changed, in the legacy event vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyChangeKind {
    Added,
    Updated,
    Deleted,
    Accepted,
    Muted,
}

/// Legacy event payload: id and category only.
#[derive(Debug, Clone)]
pub struct LegacyChange {
    pub kind: LegacyChangeKind,
    pub pattern_id: String,
    pub category: String,
}

type ChangeHandler = Box<dyn Fn(&LegacyChange) + Send + Sync>;

/// The legacy store: record map plus change callbacks.
pub struct LegacyPatternStore {
    records: RwLock<FxHashMap<String, LegacyRecord>>,
    handlers: Mutex<Vec<ChangeHandler>>,
}

impl LegacyPatternStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(FxHashMap::default()),
            handlers: Mutex::new(Vec::new()),
        }
    }

    pub fn on_change<F>(&self, handler: F)
    where
        F: Fn(&LegacyChange) + Send + Sync + 'static,
    {
        self.handlers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Box::new(handler));
    }

    fn notify(&self, change: LegacyChange) {
        let handlers = self.handlers.lock().unwrap_or_else(|e| e.into_inner());
        for handler in handlers.iter() {
            handler(&change);
        }
    }

    pub fn insert(&self, record: LegacyRecord) -> Result<(), LegacyStoreError> {
        let (id, kind) = (record.pattern_id.clone(), record.kind.clone());
        {
            let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
            if records.contains_key(&id) {
                return Err(LegacyStoreError::Duplicate(id));
            }
            records.insert(id.clone(), record);
        }
        self.notify(LegacyChange {
            kind: LegacyChangeKind::Added,
            pattern_id: id,
            category: kind,
        });
        Ok(())
    }

    pub fn fetch(&self, id: &str) -> Option<LegacyRecord> {
        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
    }

    pub fn replace(&self, record: LegacyRecord) -> Result<(), LegacyStoreError> {
        let (id, kind) = (record.pattern_id.clone(), record.kind.clone());
        {
            let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
            if !records.contains_key(&id) {
                return Err(LegacyStoreError::NotFound(id));
            }
            records.insert(id.clone(), record);
        }
        self.notify(LegacyChange {
            kind: LegacyChangeKind::Updated,
            pattern_id: id,
            category: kind,
        });
        Ok(())
    }

    pub fn remove(&self, id: &str) -> Result<bool, LegacyStoreError> {
        let removed = {
            let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
            records.remove(id)
        };
        match removed {
            Some(record) => {
                self.notify(LegacyChange {
                    kind: LegacyChangeKind::Deleted,
                    pattern_id: record.pattern_id,
                    category: record.kind,
                });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Accept an open record. Re-accepting is a transition error here —
    /// the legacy layer never learned idempotence.
    pub fn accept(&self, id: &str) -> Result<(), LegacyStoreError> {
        self.transition(id, "accepted", LegacyChangeKind::Accepted)
    }

    /// Mute an open record.
    pub fn mute(&self, id: &str) -> Result<(), LegacyStoreError> {
        self.transition(id, "muted", LegacyChangeKind::Muted)
    }

    /// Reopen an accepted or muted record.
    pub fn reopen(&self, id: &str) -> Result<(), LegacyStoreError> {
        let kind = {
            let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
            let record = records
                .get_mut(id)
                .ok_or_else(|| LegacyStoreError::NotFound(id.to_string()))?;
            if record.state == "open" {
                return Err(LegacyStoreError::InvalidStateTransition {
                    pattern_id: id.to_string(),
                    from: "open".to_string(),
                    to: "open".to_string(),
                });
            }
            record.state = "open".to_string();
            record.kind.clone()
        };
        self.notify(LegacyChange {
            kind: LegacyChangeKind::Updated,
            pattern_id: id.to_string(),
            category: kind,
        });
        Ok(())
    }

    fn transition(
        &self,
        id: &str,
        to: &str,
        change: LegacyChangeKind,
    ) -> Result<(), LegacyStoreError> {
        let kind = {
            let mut records = self.records.write().unwrap_or_else(|e| e.into_inner());
            let record = records
                .get_mut(id)
                .ok_or_else(|| LegacyStoreError::NotFound(id.to_string()))?;
            if record.state != "open" {
                return Err(LegacyStoreError::InvalidStateTransition {
                    pattern_id: id.to_string(),
                    from: record.state.clone(),
                    to: to.to_string(),
                });
            }
            record.state = to.to_string();
            record.kind.clone()
        };
        self.notify(LegacyChange {
            kind: change,
            pattern_id: id.to_string(),
            category: kind,
        });
        Ok(())
    }

    pub fn all(&self) -> Vec<LegacyRecord> {
        let mut records: Vec<LegacyRecord> = self
            .records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();
        records.sort_by(|a, b| a.pattern_id.cmp(&b.pattern_id));
        records
    }
}

impl Default for LegacyPatternStore {
    fn default() -> Self {
        Self::new()
    }
}
