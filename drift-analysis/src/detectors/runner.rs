//! Detector execution — parallel across files, failures contained.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use rayon::prelude::*;

use drift_core::cancel::{Budget, CancellationToken};
use drift_core::errors::CancelError;

use super::traits::{DetectionContext, DetectionResult, Detector};

/// Outcome of one detector pass over a set of files.
#[derive(Debug, Default)]
pub struct RunOutcome {
    /// `(detector id, file, result)` for every successful detection.
    pub results: Vec<(String, String, DetectionResult)>,
    /// `(detector id, file, message)` for contained failures.
    pub failures: Vec<(String, String, String)>,
    /// Results whose confidence fell below the reporting threshold; they are
    /// surfaced but contribute no violations.
    pub low_confidence: Vec<(String, String, DetectionResult)>,
}

/// Runs detectors over contexts, one file per task.
pub struct DetectorRunner {
    /// Results under this confidence are reported without violations.
    pub min_confidence: f64,
}

impl DetectorRunner {
    pub fn new(min_confidence: f64) -> Self {
        Self { min_confidence }
    }

    /// Run every detector against every context it supports.
    ///
    /// A detector that returns an error or panics is logged and omitted from
    /// the pass. Cancellation is checked between files; on cancel the partial
    /// outcome is discarded and `Err(Cancelled)` returned.
    pub fn run(
        &self,
        detectors: &[Arc<dyn Detector>],
        contexts: &[DetectionContext],
        cancel: &CancellationToken,
        budget: &Budget,
    ) -> Result<RunOutcome, CancelError> {
        let per_file: Vec<Result<RunOutcome, CancelError>> = contexts
            .par_iter()
            .map(|context| {
                cancel.check()?;
                budget.check()?;
                Ok(self.run_file(detectors, context))
            })
            .collect();

        let mut outcome = RunOutcome::default();
        for file_outcome in per_file {
            let file_outcome = file_outcome?;
            outcome.results.extend(file_outcome.results);
            outcome.failures.extend(file_outcome.failures);
            outcome.low_confidence.extend(file_outcome.low_confidence);
        }
        // Deterministic output: order by (detector, file).
        outcome
            .results
            .sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
        outcome
            .failures
            .sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
        Ok(outcome)
    }

    fn run_file(&self, detectors: &[Arc<dyn Detector>], context: &DetectionContext) -> RunOutcome {
        let mut outcome = RunOutcome::default();
        for detector in detectors {
            if !detector.supports_language(&context.language) {
                continue;
            }
            let id = detector.info().id.clone();
            let detection = catch_unwind(AssertUnwindSafe(|| detector.detect(context)));
            match detection {
                Ok(Ok(result)) => {
                    if let Err(e) = result.validate(&id) {
                        tracing::warn!(detector = %id, file = %context.file, error = %e, "invalid detector result dropped");
                        outcome.failures.push((id, context.file.clone(), e.to_string()));
                        continue;
                    }
                    if result.confidence < self.min_confidence {
                        let mut stripped = result;
                        stripped.violations.clear();
                        outcome
                            .low_confidence
                            .push((id, context.file.clone(), stripped));
                    } else {
                        outcome.results.push((id, context.file.clone(), result));
                    }
                }
                Ok(Err(e)) => {
                    tracing::warn!(detector = %id, file = %context.file, error = %e, "detector failed; omitting its results");
                    outcome.failures.push((id, context.file.clone(), e.to_string()));
                }
                Err(_) => {
                    tracing::warn!(detector = %id, file = %context.file, "detector panicked; omitting its results");
                    outcome
                        .failures
                        .push((id, context.file.clone(), "detector panicked".to_string()));
                }
            }
        }
        outcome
    }
}
