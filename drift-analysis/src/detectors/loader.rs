//! Lazy detector loading.
//!
//! A module descriptor registers a detector's metadata and a constructor
//! without instantiating it. The first `get` drives pending → loading →
//! loaded | failed; concurrent callers block on the same in-flight load
//! instead of constructing twice.

use std::sync::{Arc, Condvar, Mutex};

use rustc_hash::FxHashMap;

use drift_core::errors::DetectionError;

use super::registry::DetectorRegistry;
use super::traits::{Detector, DetectorInfo};

/// Constructor for a lazily loaded detector.
pub type DetectorFactory =
    Box<dyn Fn(&serde_json::Value) -> Result<Arc<dyn Detector>, String> + Send + Sync>;

/// Registration record for a detector that has not been constructed yet.
pub struct ModuleDescriptor {
    pub id: String,
    pub info: DetectorInfo,
    /// Provenance of the implementation ("builtin://regex", a plugin path, …).
    pub module_path: String,
    pub export_name: Option<String>,
    pub options: serde_json::Value,
    pub factory: DetectorFactory,
}

/// Per-module load state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Loading,
    Loaded,
    Failed(String),
}

struct LoaderRecord {
    descriptor: ModuleDescriptor,
    state: LoadState,
    detector: Option<Arc<dyn Detector>>,
}

/// Loader over a registry: descriptors in, constructed detectors on demand.
pub struct LazyDetectorLoader {
    records: Mutex<FxHashMap<String, LoaderRecord>>,
    loaded_cv: Condvar,
}

impl LazyDetectorLoader {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(FxHashMap::default()),
            loaded_cv: Condvar::new(),
        }
    }

    /// Register a module descriptor without loading any code.
    pub fn register(&self, descriptor: ModuleDescriptor) -> Result<(), DetectionError> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        if records.contains_key(&descriptor.id) {
            return Err(DetectionError::DetectorAlreadyRegistered {
                id: descriptor.id,
            });
        }
        let id = descriptor.id.clone();
        records.insert(
            id,
            LoaderRecord {
                descriptor,
                state: LoadState::Pending,
                detector: None,
            },
        );
        Ok(())
    }

    /// Current load state, or None for an unknown id.
    pub fn status(&self, id: &str) -> Option<LoadState> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.get(id).map(|r| r.state.clone())
    }

    /// Registered metadata, or None for an unknown id.
    pub fn info(&self, id: &str) -> Option<DetectorInfo> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.get(id).map(|r| r.descriptor.info.clone())
    }

    /// Get the detector, loading it on first use.
    ///
    /// Exactly one caller performs the construction; others wait on it and
    /// share the outcome. A failed load is sticky until `unregister`.
    pub fn get(&self, id: &str) -> Result<Arc<dyn Detector>, DetectionError> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            let state = records
                .get(id)
                .map(|r| r.state.clone())
                .ok_or_else(|| DetectionError::DetectorNotFound { id: id.to_string() })?;
            match state {
                LoadState::Loaded => {
                    // Loaded implies the instance is present.
                    return records.get(id).and_then(|r| r.detector.clone()).ok_or_else(
                        || DetectionError::LoadFailed {
                            id: id.to_string(),
                            message: "loaded record lost its instance".to_string(),
                        },
                    );
                }
                LoadState::Failed(message) => {
                    return Err(DetectionError::LoadFailed {
                        id: id.to_string(),
                        message,
                    });
                }
                LoadState::Loading => {
                    // Another caller owns the in-flight load; wait for it.
                    records = self
                        .loaded_cv
                        .wait(records)
                        .unwrap_or_else(|e| e.into_inner());
                }
                LoadState::Pending => {
                    let record = records.get_mut(id).ok_or_else(|| {
                        DetectionError::DetectorNotFound { id: id.to_string() }
                    })?;
                    record.state = LoadState::Loading;
                    let outcome = (record.descriptor.factory)(&record.descriptor.options);
                    match outcome {
                        Ok(detector) => {
                            record.detector = Some(Arc::clone(&detector));
                            record.state = LoadState::Loaded;
                            self.loaded_cv.notify_all();
                            return Ok(detector);
                        }
                        Err(message) => {
                            record.state = LoadState::Failed(message.clone());
                            self.loaded_cv.notify_all();
                            return Err(DetectionError::LoadFailed {
                                id: id.to_string(),
                                message,
                            });
                        }
                    }
                }
            }
        }
    }

    /// Load (if needed) and mirror the detector into `registry`.
    pub fn load_into(
        &self,
        id: &str,
        registry: &mut DetectorRegistry,
        priority: i32,
    ) -> Result<(), DetectionError> {
        let detector = self.get(id)?;
        if !registry.contains(id) {
            registry.register(detector, priority, false)?;
        }
        Ok(())
    }

    /// Remove both the loader record and any registry entry for `id`.
    pub fn unregister(&self, id: &str, registry: &mut DetectorRegistry) -> bool {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let removed = records.remove(id).is_some();
        let registry_removed = registry.unregister(id);
        removed || registry_removed
    }

    /// Ids of all registered modules.
    pub fn module_ids(&self) -> Vec<String> {
        let records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let mut ids: Vec<String> = records.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl Default for LazyDetectorLoader {
    fn default() -> Self {
        Self::new()
    }
}
