//! Adapter exposing the unified repository surface over the legacy store.
//!
//! Conversions are lossless for every documented pattern field (the legacy
//! `extras` blob carries what its schema never modeled) and best-effort for
//! `metadata.custom`. After each mutation the adapter re-fetches the record
//! before re-emitting, so unified events always carry current state.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use drift_core::errors::PatternError;
use drift_core::events::{EventBus, PatternEvent, SubscriptionToken};
use drift_core::types::{
    ConfidenceLevel, DetectionMethod, Location, Outlier, Pattern, PatternMetadata, PatternStatus,
    Severity,
};

use super::store::{LegacyPatternStore, LegacyRecord, LegacySite, LegacyStoreError};

fn status_to_state(status: PatternStatus) -> &'static str {
    match status {
        PatternStatus::Discovered => "open",
        PatternStatus::Approved => "accepted",
        PatternStatus::Ignored => "muted",
    }
}

fn state_to_status(state: &str) -> PatternStatus {
    match state {
        "accepted" => PatternStatus::Approved,
        "muted" => PatternStatus::Ignored,
        _ => PatternStatus::Discovered,
    }
}

fn to_record(pattern: &Pattern) -> LegacyRecord {
    // Fields the legacy schema has no columns for ride in `extras`.
    let extras = serde_json::json!({
        "subcategory": pattern.subcategory,
        "description": pattern.description,
        "detectorId": pattern.detector_id,
        "detectorName": pattern.detector_name,
        "detectionMethod": pattern.detection_method,
        "severity": pattern.severity,
        "outliers": pattern.outliers,
        "firstSeen": pattern.first_seen,
        "lastSeen": pattern.last_seen,
        "approvedAt": pattern.approved_at,
        "approvedBy": pattern.approved_by,
        "tags": pattern.tags,
        "autoFixable": pattern.auto_fixable,
        "version": pattern.metadata.version,
        "custom": pattern.metadata.custom,
    });
    LegacyRecord {
        pattern_id: pattern.id.clone(),
        kind: pattern.category.clone(),
        label: pattern.name.clone(),
        score: pattern.confidence,
        state: status_to_state(pattern.status).to_string(),
        sites: pattern
            .locations
            .iter()
            .map(|l| LegacySite {
                path: l.file.clone(),
                line: l.line,
            })
            .collect(),
        extras,
    }
}

fn from_record(record: &LegacyRecord) -> Pattern {
    let extras = &record.extras;
    let get_str = |key: &str| {
        extras
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    };
    let get_time = |key: &str| -> Option<DateTime<Utc>> {
        extras
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    };

    let now = Utc::now();
    let confidence = record.score.clamp(0.0, 1.0);
    let status = state_to_status(&record.state);
    Pattern {
        id: record.pattern_id.clone(),
        category: record.kind.clone(),
        subcategory: get_str("subcategory"),
        name: record.label.clone(),
        description: get_str("description"),
        detector_id: get_str("detectorId"),
        detector_name: get_str("detectorName"),
        detection_method: extras
            .get("detectionMethod")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or(DetectionMethod::Custom),
        confidence,
        confidence_level: ConfidenceLevel::from_confidence(confidence),
        locations: record
            .sites
            .iter()
            .map(|s| Location::new(s.path.clone(), s.line))
            .collect(),
        outliers: extras
            .get("outliers")
            .and_then(|v| serde_json::from_value::<Vec<Outlier>>(v.clone()).ok())
            .unwrap_or_default(),
        status,
        severity: extras
            .get("severity")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or(Severity::Info),
        first_seen: get_time("firstSeen").unwrap_or(now),
        last_seen: get_time("lastSeen").unwrap_or(now),
        approved_at: if status == PatternStatus::Approved {
            get_time("approvedAt").or(Some(now))
        } else {
            None
        },
        approved_by: extras
            .get("approvedBy")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        tags: extras
            .get("tags")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default(),
        auto_fixable: extras
            .get("autoFixable")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        metadata: PatternMetadata {
            version: extras.get("version").and_then(|v| v.as_u64()).unwrap_or(0),
            custom: extras.get("custom").filter(|v| !v.is_null()).cloned(),
        },
    }
}

fn map_err(e: LegacyStoreError) -> PatternError {
    match e {
        LegacyStoreError::NotFound(id) => PatternError::PatternNotFound { id },
        LegacyStoreError::Duplicate(id) => PatternError::PatternAlreadyExists { id },
        LegacyStoreError::InvalidStateTransition {
            pattern_id,
            from,
            to,
        } => PatternError::InvalidStatusTransition {
            id: pattern_id,
            // Legacy state names translate to the unified vocabulary.
            from: state_to_status(&from).name().to_string(),
            to: state_to_status(&to).name().to_string(),
        },
    }
}

/// The unified face of the legacy store.
pub struct LegacyStoreAdapter {
    store: Arc<LegacyPatternStore>,
    bus: EventBus,
}

impl LegacyStoreAdapter {
    pub fn new(store: Arc<LegacyPatternStore>) -> Self {
        Self {
            store,
            bus: EventBus::new(),
        }
    }

    pub fn on<F>(&self, handler: F) -> SubscriptionToken
    where
        F: Fn(&PatternEvent) + Send + Sync + 'static,
    {
        self.bus.subscribe(handler)
    }

    pub fn off(&self, token: SubscriptionToken) -> bool {
        self.bus.unsubscribe(token)
    }

    /// Re-fetch a record and emit a unified event built from current state.
    fn emit_current(&self, id: &str, make: impl FnOnce(Pattern) -> PatternEvent) {
        if let Some(record) = self.store.fetch(id) {
            self.bus.emit(&make(from_record(&record)));
        }
    }

    pub fn add(&self, pattern: &Pattern) -> Result<(), PatternError> {
        self.store.insert(to_record(pattern)).map_err(map_err)?;
        self.emit_current(&pattern.id, PatternEvent::Added);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Pattern> {
        self.store.fetch(id).map(|r| from_record(&r))
    }

    pub fn update(&self, pattern: &Pattern) -> Result<(), PatternError> {
        self.store.replace(to_record(pattern)).map_err(map_err)?;
        self.emit_current(&pattern.id, PatternEvent::Updated);
        Ok(())
    }

    /// Deletion events carry only `{id, category}` — the record is gone.
    pub fn delete(&self, id: &str) -> Result<bool, PatternError> {
        let category = self.store.fetch(id).map(|r| r.kind);
        let removed = self.store.remove(id).map_err(map_err)?;
        if removed {
            self.bus.emit(&PatternEvent::Deleted {
                id: id.to_string(),
                category: category.unwrap_or_default(),
            });
        }
        Ok(removed)
    }

    /// Approve via the legacy accept. The legacy layer raises a transition
    /// error on re-accept; the unified contract makes that an idempotent
    /// no-op, so the adapter absorbs exactly that case.
    pub fn approve(&self, id: &str, by: Option<&str>) -> Result<Pattern, PatternError> {
        match self.store.accept(id) {
            Ok(()) => {}
            Err(LegacyStoreError::InvalidStateTransition { ref from, .. }) if from == "accepted" => {
                return self
                    .get(id)
                    .ok_or_else(|| PatternError::PatternNotFound { id: id.to_string() });
            }
            Err(e) => return Err(map_err(e)),
        }
        // Stamp approval metadata into extras, then re-fetch for the event.
        if let Some(mut record) = self.store.fetch(id) {
            if let Some(extras) = record.extras.as_object_mut() {
                extras.insert("approvedAt".to_string(), serde_json::json!(Utc::now()));
                extras.insert("approvedBy".to_string(), serde_json::json!(by));
            }
            self.store.replace(record).map_err(map_err)?;
        }
        let pattern = self
            .get(id)
            .ok_or_else(|| PatternError::PatternNotFound { id: id.to_string() })?;
        self.bus.emit(&PatternEvent::Approved(pattern.clone()));
        Ok(pattern)
    }

    pub fn ignore(&self, id: &str) -> Result<Pattern, PatternError> {
        match self.store.mute(id) {
            Ok(()) => {}
            Err(LegacyStoreError::InvalidStateTransition { ref from, .. }) if from == "muted" => {
                return self
                    .get(id)
                    .ok_or_else(|| PatternError::PatternNotFound { id: id.to_string() });
            }
            Err(e) => return Err(map_err(e)),
        }
        let pattern = self
            .get(id)
            .ok_or_else(|| PatternError::PatternNotFound { id: id.to_string() })?;
        self.bus.emit(&PatternEvent::Ignored(pattern.clone()));
        Ok(pattern)
    }

    pub fn revert(&self, id: &str) -> Result<Pattern, PatternError> {
        self.store.reopen(id).map_err(map_err)?;
        // Clear the stale approval stamp so invariants hold after revert.
        if let Some(mut record) = self.store.fetch(id) {
            if let Some(extras) = record.extras.as_object_mut() {
                extras.insert("approvedAt".to_string(), serde_json::Value::Null);
                extras.insert("approvedBy".to_string(), serde_json::Value::Null);
            }
            self.store.replace(record).map_err(map_err)?;
        }
        let pattern = self
            .get(id)
            .ok_or_else(|| PatternError::PatternNotFound { id: id.to_string() })?;
        self.bus.emit(&PatternEvent::Updated(pattern.clone()));
        Ok(pattern)
    }

    pub fn get_all(&self) -> Vec<Pattern> {
        self.store.all().iter().map(from_record).collect()
    }
}
