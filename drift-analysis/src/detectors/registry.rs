//! Detector registry — id-keyed metadata plus query filters.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;

use drift_core::errors::DetectionError;

use super::traits::{Detector, DetectorInfo};

/// One registered detector: metadata plus the live instance.
#[derive(Clone)]
pub struct RegistryEntry {
    pub info: DetectorInfo,
    pub detector: Arc<dyn Detector>,
    pub priority: i32,
    pub enabled: bool,
    pub registered_at: DateTime<Utc>,
}

/// Query filters. All present fields must match (conjunction).
#[derive(Debug, Clone, Default)]
pub struct DetectorQuery {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub language: Option<String>,
    pub detection_method: Option<drift_core::types::DetectionMethod>,
    pub enabled: Option<bool>,
    /// Substring match on the detector id.
    pub id_pattern: Option<String>,
}

/// Query outcome: matching entries and their count.
pub struct QueryResult {
    pub detectors: Vec<RegistryEntry>,
    pub count: usize,
}

/// Maps detector id to its registration record.
#[derive(Default)]
pub struct DetectorRegistry {
    entries: FxHashMap<String, RegistryEntry>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Register a detector. Fails when the id exists, unless `override_existing`.
    pub fn register(
        &mut self,
        detector: Arc<dyn Detector>,
        priority: i32,
        override_existing: bool,
    ) -> Result<(), DetectionError> {
        let info = detector.info().clone();
        if self.entries.contains_key(&info.id) && !override_existing {
            return Err(DetectionError::DetectorAlreadyRegistered { id: info.id });
        }
        let id = info.id.clone();
        self.entries.insert(
            id,
            RegistryEntry {
                info,
                detector,
                priority,
                enabled: true,
                registered_at: Utc::now(),
            },
        );
        Ok(())
    }

    /// Remove a detector. Returns false when the id is unknown.
    pub fn unregister(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flip the enabled flag. Returns false when the id is unknown.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.entries.get_mut(id) {
            Some(entry) => {
                entry.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Filtered query, ordered by descending priority then id.
    pub fn query(&self, filter: &DetectorQuery) -> QueryResult {
        let mut detectors: Vec<RegistryEntry> = self
            .entries
            .values()
            .filter(|e| {
                filter
                    .category
                    .as_deref()
                    .map_or(true, |c| e.info.category == c)
                    && filter
                        .subcategory
                        .as_deref()
                        .map_or(true, |s| e.info.subcategory == s)
                    && filter.language.as_deref().map_or(true, |l| {
                        e.info.supported_languages.is_empty()
                            || e.info.supported_languages.iter().any(|x| x == "*" || x == l)
                    })
                    && filter
                        .detection_method
                        .map_or(true, |m| e.info.detection_method == m)
                    && filter.enabled.map_or(true, |en| e.enabled == en)
                    && filter
                        .id_pattern
                        .as_deref()
                        .map_or(true, |p| e.info.id.contains(p))
            })
            .cloned()
            .collect();
        detectors.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.info.id.cmp(&b.info.id))
        });
        let count = detectors.len();
        QueryResult { detectors, count }
    }

    /// All enabled detectors supporting `language`, priority order.
    pub fn for_language(&self, language: &str) -> Vec<Arc<dyn Detector>> {
        self.query(&DetectorQuery {
            language: Some(language.to_string()),
            enabled: Some(true),
            ..Default::default()
        })
        .detectors
        .into_iter()
        .map(|e| e.detector)
        .collect()
    }
}
