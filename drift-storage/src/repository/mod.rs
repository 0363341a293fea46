//! The pattern repository — durable, queryable, event-emitting owner of
//! every pattern in the workspace.
//!
//! Writes are serialized behind a writer-exclusive lock; readers clone a
//! snapshot. Events fire on the mutating thread after the in-memory write
//! completes and before the call returns — but outside the lock, so
//! handlers can re-enter read operations.

pub mod query;
pub mod store;

pub use query::{
    Pagination, PatternFilter, QueryOptions, QueryResult, Sort, SortDirection, SortField,
};

use std::sync::RwLock;

use chrono::Utc;
use rustc_hash::FxHashMap;

use drift_core::events::{EventBus, PatternEvent, SubscriptionToken};
use drift_core::errors::PatternError;
use drift_core::types::{Pattern, PatternStatus, PatternSummary, Severity};

use crate::workspace::Workspace;

/// Partial update applied by [`PatternRepository::update`]. Unset fields
/// are left unchanged; derived fields are recomputed after application.
#[derive(Debug, Clone, Default)]
pub struct PatternPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub confidence: Option<f64>,
    pub severity: Option<Severity>,
    pub locations: Option<Vec<drift_core::types::Location>>,
    pub outliers: Option<Vec<drift_core::types::Outlier>>,
    pub tags: Option<Vec<String>>,
    pub auto_fixable: Option<bool>,
    pub custom_metadata: Option<serde_json::Value>,
}

struct State {
    patterns: FxHashMap<String, Pattern>,
    initialized: bool,
}

/// The exclusive owner of patterns: all mutation goes through repository
/// operations, and every mutation emits its lifecycle event.
pub struct PatternRepository {
    state: RwLock<State>,
    bus: EventBus,
    workspace: Workspace,
}

impl PatternRepository {
    pub fn new(workspace: Workspace) -> Self {
        Self {
            state: RwLock::new(State {
                patterns: FxHashMap::default(),
                initialized: false,
            }),
            bus: EventBus::new(),
            workspace,
        }
    }

    /// Load the on-disk store. Tolerant: unreadable files are skipped.
    pub fn initialize(&self) -> Result<(), PatternError> {
        self.workspace.initialize().map_err(|e| PatternError::StoreIo {
            message: e.to_string(),
        })?;
        let loaded = store::load_all(&self.workspace);
        let count = loaded.len();
        {
            let mut state = self.write_lock();
            state.patterns = loaded.into_iter().map(|p| (p.id.clone(), p)).collect();
            state.initialized = true;
        }
        self.bus.emit(&PatternEvent::Loaded { count });
        Ok(())
    }

    /// Persist and mark uninitialized. Further calls require `initialize`.
    pub fn close(&self) -> Result<(), PatternError> {
        self.save_all()?;
        self.write_lock().initialized = false;
        Ok(())
    }

    // ---- event subscription ----

    pub fn on<F>(&self, handler: F) -> SubscriptionToken
    where
        F: Fn(&PatternEvent) + Send + Sync + 'static,
    {
        self.bus.subscribe(handler)
    }

    pub fn off(&self, token: SubscriptionToken) -> bool {
        self.bus.unsubscribe(token)
    }

    // ---- mutation ----

    /// Add a new pattern. Fails when the id already exists.
    pub fn add(&self, mut pattern: Pattern) -> Result<(), PatternError> {
        pattern.confidence = pattern.confidence.clamp(0.0, 1.0);
        pattern.confidence_level =
            drift_core::types::ConfidenceLevel::from_confidence(pattern.confidence);
        {
            let mut state = self.write_lock();
            Self::ensure_initialized(&state)?;
            if state.patterns.contains_key(&pattern.id) {
                return Err(PatternError::PatternAlreadyExists { id: pattern.id });
            }
            state.patterns.insert(pattern.id.clone(), pattern.clone());
        }
        self.bus.emit(&PatternEvent::Added(pattern));
        Ok(())
    }

    /// Add a batch. Events are emitted per item, in input order.
    pub fn add_many(&self, patterns: Vec<Pattern>) -> Result<usize, PatternError> {
        let mut added = 0usize;
        for pattern in patterns {
            self.add(pattern)?;
            added += 1;
        }
        Ok(added)
    }

    /// Apply a partial update. Derived fields (confidence level, version,
    /// last-seen ordering) are recomputed after application.
    pub fn update(&self, id: &str, patch: PatternPatch) -> Result<Pattern, PatternError> {
        let updated = {
            let mut state = self.write_lock();
            Self::ensure_initialized(&state)?;
            let pattern = state
                .patterns
                .get_mut(id)
                .ok_or_else(|| PatternError::PatternNotFound { id: id.to_string() })?;
            if let Some(name) = patch.name {
                pattern.name = name;
            }
            if let Some(description) = patch.description {
                pattern.description = description;
            }
            if let Some(confidence) = patch.confidence {
                pattern.confidence = confidence;
            }
            if let Some(severity) = patch.severity {
                pattern.severity = severity;
            }
            if let Some(locations) = patch.locations {
                pattern.locations = locations;
            }
            if let Some(outliers) = patch.outliers {
                pattern.outliers = outliers;
            }
            if let Some(tags) = patch.tags {
                pattern.tags = tags;
            }
            if let Some(auto_fixable) = patch.auto_fixable {
                pattern.auto_fixable = auto_fixable;
            }
            if let Some(custom) = patch.custom_metadata {
                pattern.metadata.custom = Some(custom);
            }
            pattern.touch();
            pattern.clone()
        };
        self.bus.emit(&PatternEvent::Updated(updated.clone()));
        Ok(updated)
    }

    /// Delete a pattern. A missing id returns `false` without error.
    pub fn delete(&self, id: &str) -> Result<bool, PatternError> {
        let removed = {
            let mut state = self.write_lock();
            Self::ensure_initialized(&state)?;
            state.patterns.remove(id)
        };
        match removed {
            Some(pattern) => {
                self.bus.emit(&PatternEvent::Deleted {
                    id: pattern.id,
                    category: pattern.category,
                });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Approve a discovered pattern, stamping `approvedAt`/`approvedBy`.
    ///
    /// Approving an already-approved pattern is an idempotent no-op (no
    /// event). Approving an ignored pattern is an invalid transition —
    /// revert it first.
    pub fn approve(&self, id: &str, by: Option<&str>) -> Result<Pattern, PatternError> {
        let (pattern, transitioned) = {
            let mut state = self.write_lock();
            Self::ensure_initialized(&state)?;
            let pattern = state
                .patterns
                .get_mut(id)
                .ok_or_else(|| PatternError::PatternNotFound { id: id.to_string() })?;
            match pattern.status {
                PatternStatus::Approved => (pattern.clone(), false),
                PatternStatus::Ignored => {
                    return Err(PatternError::InvalidStatusTransition {
                        id: id.to_string(),
                        from: "ignored".to_string(),
                        to: "approved".to_string(),
                    });
                }
                PatternStatus::Discovered => {
                    pattern.status = PatternStatus::Approved;
                    pattern.approved_at = Some(Utc::now());
                    pattern.approved_by = by.map(str::to_string);
                    pattern.touch();
                    (pattern.clone(), true)
                }
            }
        };
        if transitioned {
            self.bus.emit(&PatternEvent::Approved(pattern.clone()));
        }
        Ok(pattern)
    }

    /// Ignore a discovered pattern. Clears any stale approval stamp.
    pub fn ignore(&self, id: &str) -> Result<Pattern, PatternError> {
        let (pattern, transitioned) = {
            let mut state = self.write_lock();
            Self::ensure_initialized(&state)?;
            let pattern = state
                .patterns
                .get_mut(id)
                .ok_or_else(|| PatternError::PatternNotFound { id: id.to_string() })?;
            match pattern.status {
                PatternStatus::Ignored => (pattern.clone(), false),
                PatternStatus::Approved => {
                    return Err(PatternError::InvalidStatusTransition {
                        id: id.to_string(),
                        from: "approved".to_string(),
                        to: "ignored".to_string(),
                    });
                }
                PatternStatus::Discovered => {
                    pattern.status = PatternStatus::Ignored;
                    pattern.approved_at = None;
                    pattern.approved_by = None;
                    pattern.touch();
                    (pattern.clone(), true)
                }
            }
        };
        if transitioned {
            self.bus.emit(&PatternEvent::Ignored(pattern.clone()));
        }
        Ok(pattern)
    }

    /// Admin revert: approved or ignored back to discovered.
    pub fn revert(&self, id: &str) -> Result<Pattern, PatternError> {
        let pattern = {
            let mut state = self.write_lock();
            Self::ensure_initialized(&state)?;
            let pattern = state
                .patterns
                .get_mut(id)
                .ok_or_else(|| PatternError::PatternNotFound { id: id.to_string() })?;
            if pattern.status == PatternStatus::Discovered {
                return Err(PatternError::InvalidStatusTransition {
                    id: id.to_string(),
                    from: "discovered".to_string(),
                    to: "discovered".to_string(),
                });
            }
            pattern.status = PatternStatus::Discovered;
            pattern.approved_at = None;
            pattern.approved_by = None;
            pattern.touch();
            pattern.clone()
        };
        self.bus.emit(&PatternEvent::Updated(pattern.clone()));
        Ok(pattern)
    }

    /// Remove every pattern from memory. Disk is untouched until `save_all`.
    pub fn clear(&self) -> Result<usize, PatternError> {
        let mut state = self.write_lock();
        Self::ensure_initialized(&state)?;
        let count = state.patterns.len();
        state.patterns.clear();
        Ok(count)
    }

    /// Persist every pattern into its status directory and prune stale
    /// files. Holds the writer lock for the duration of the rename set.
    pub fn save_all(&self) -> Result<usize, PatternError> {
        let count = {
            let state = self.write_lock();
            Self::ensure_initialized(&state)?;
            let mut patterns: Vec<Pattern> = state.patterns.values().cloned().collect();
            patterns.sort_by(|a, b| a.id.cmp(&b.id));
            store::save_all(&self.workspace, &patterns)?;
            patterns.len()
        };
        self.bus.emit(&PatternEvent::Saved { count });
        Ok(count)
    }

    // ---- reads ----

    pub fn get(&self, id: &str) -> Result<Option<Pattern>, PatternError> {
        let state = self.read_lock();
        Self::ensure_initialized(&state)?;
        Ok(state.patterns.get(id).cloned())
    }

    pub fn exists(&self, id: &str) -> Result<bool, PatternError> {
        let state = self.read_lock();
        Self::ensure_initialized(&state)?;
        Ok(state.patterns.contains_key(id))
    }

    pub fn query(&self, opts: &QueryOptions) -> Result<QueryResult, PatternError> {
        let snapshot = self.snapshot()?;
        Ok(query::run_query(&snapshot, opts))
    }

    pub fn get_all(&self) -> Result<Vec<Pattern>, PatternError> {
        self.snapshot()
    }

    pub fn get_by_category(&self, category: &str) -> Result<Vec<Pattern>, PatternError> {
        Ok(self
            .snapshot()?
            .into_iter()
            .filter(|p| p.category == category)
            .collect())
    }

    pub fn get_by_status(&self, status: PatternStatus) -> Result<Vec<Pattern>, PatternError> {
        Ok(self
            .snapshot()?
            .into_iter()
            .filter(|p| p.status == status)
            .collect())
    }

    pub fn get_by_file(&self, file: &str) -> Result<Vec<Pattern>, PatternError> {
        Ok(self
            .snapshot()?
            .into_iter()
            .filter(|p| p.locations.iter().any(|l| l.file == file))
            .collect())
    }

    pub fn count(&self, filter: Option<&PatternFilter>) -> Result<usize, PatternError> {
        let snapshot = self.snapshot()?;
        Ok(match filter {
            Some(f) => snapshot.iter().filter(|p| f.matches(p)).count(),
            None => snapshot.len(),
        })
    }

    pub fn get_summaries(&self) -> Result<Vec<PatternSummary>, PatternError> {
        Ok(self.snapshot()?.iter().map(PatternSummary::from).collect())
    }

    // ---- internals ----

    /// Id-ordered clone of the current pattern set.
    fn snapshot(&self) -> Result<Vec<Pattern>, PatternError> {
        let state = self.read_lock();
        Self::ensure_initialized(&state)?;
        let mut patterns: Vec<Pattern> = state.patterns.values().cloned().collect();
        patterns.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(patterns)
    }

    fn ensure_initialized(state: &State) -> Result<(), PatternError> {
        if state.initialized {
            Ok(())
        } else {
            Err(PatternError::NotInitialized)
        }
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn read_lock(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }
}
