//! Gate orchestrator — runs a policy's gates in id order and aggregates
//! a deterministic verdict.
//!
//! Given identical workspace state, baseline, policy, and changed-file set,
//! the output is byte-identical: gates sorted by id, violations sorted by
//! `(file, line, patternId)`.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use drift_core::cancel::{Budget, CancellationToken};
use drift_core::config::{AggregationMode, GatesConfig};
use drift_core::types::Violation;

use super::constraint_verification::ConstraintVerificationGate;
use super::custom_rules::CustomRulesGate;
use super::impact_gate::ImpactSimulationGate;
use super::pattern_compliance::PatternComplianceGate;
use super::regression::RegressionDetectionGate;
use super::security_boundary::SecurityBoundaryGate;
use super::types::{GateInput, GateResult, GateStatus, QualityGate, QualityGateResult, RunMetadata};

/// Runs configured gates against the current workspace and a baseline.
pub struct GateOrchestrator {
    gates: Vec<Box<dyn QualityGate>>,
}

impl GateOrchestrator {
    /// The closed default gate set, ordered by id at run time.
    pub fn new() -> Self {
        let gates: Vec<Box<dyn QualityGate>> = vec![
            Box::new(PatternComplianceGate),
            Box::new(ConstraintVerificationGate),
            Box::new(RegressionDetectionGate),
            Box::new(ImpactSimulationGate),
            Box::new(SecurityBoundaryGate),
            Box::new(CustomRulesGate),
        ];
        Self { gates }
    }

    /// Custom gate set, for embedders that extend the closed set.
    pub fn with_gates(gates: Vec<Box<dyn QualityGate>>) -> Self {
        Self { gates }
    }

    /// Gate ids in execution order.
    pub fn gate_ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<&'static str> = self.gates.iter().map(|g| g.id()).collect();
        ids.sort_unstable();
        ids
    }

    /// Run the policy. Always returns an envelope: even a catastrophic
    /// failure produces the deterministic internal-error result.
    pub fn run(
        &self,
        config: &GatesConfig,
        input: &GateInput,
        cancel: &CancellationToken,
        budget: &Budget,
    ) -> QualityGateResult {
        let started = Instant::now();
        let mut ordered: Vec<&Box<dyn QualityGate>> = self.gates.iter().collect();
        ordered.sort_by_key(|g| g.id());

        let mut results: Vec<GateResult> = Vec::new();
        let mut gates_run = Vec::new();
        let mut gates_skipped = Vec::new();
        let mut warnings = Vec::new();

        for gate in ordered {
            let id = gate.id();
            if !config.gate_enabled(id) {
                gates_skipped.push(id.to_string());
                continue;
            }
            if cancel.is_cancelled() {
                return QualityGateResult::internal_error("gate run cancelled");
            }

            let gate_config = config
                .gate_config
                .get(id)
                .cloned()
                .unwrap_or(serde_json::Value::Null);

            let validation = gate.validate_config(&gate_config);
            if !validation.valid {
                // Invalid config skips the gate with a warning, never fails it.
                warnings.push(format!(
                    "gate '{id}' skipped: invalid config ({})",
                    validation.errors.join("; ")
                ));
                gates_skipped.push(id.to_string());
                continue;
            }

            let gate_started = Instant::now();
            let outcome = catch_unwind(AssertUnwindSafe(|| gate.execute(input, &gate_config)));
            let elapsed_ms = gate_started.elapsed().as_millis() as u64;

            let mut result = match outcome {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(gate = id, "gate panicked");
                    GateResult::fail(id, gate.name(), 0.0, "internal error", Vec::new())
                }
            };
            result.execution_time_ms = elapsed_ms;

            // Budget exhaustion downgrades to warned so CI is not gated on
            // transient slowness.
            if budget.is_exhausted() && result.status == GateStatus::Failed {
                result.status = GateStatus::Warned;
                result.passed = true;
                result.warnings.push("timeout".to_string());
            } else if budget.is_exhausted() {
                result.warnings.push("timeout".to_string());
                if result.status == GateStatus::Passed {
                    result.status = GateStatus::Warned;
                }
            }

            gates_run.push(id.to_string());
            results.push(result);
        }

        let mut violations: Vec<Violation> = results
            .iter()
            .flat_map(|r| r.violations.iter().cloned())
            .collect();
        violations.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        let (status, passed, score) = Self::aggregate(config, &results);

        for result in &results {
            warnings.extend(result.warnings.iter().cloned());
        }

        QualityGateResult {
            status,
            passed,
            score,
            gates: results,
            violations,
            warnings,
            metadata: RunMetadata {
                gates_run,
                gates_skipped,
                duration_ms: started.elapsed().as_millis() as u64,
            },
        }
    }

    fn aggregate(config: &GatesConfig, results: &[GateResult]) -> (GateStatus, bool, f64) {
        if results.is_empty() {
            return (GateStatus::Passed, true, 100.0);
        }
        let any_failed = results.iter().any(|r| r.status == GateStatus::Failed);
        let any_warned = results.iter().any(|r| r.status == GateStatus::Warned);
        let any_passed = results
            .iter()
            .any(|r| matches!(r.status, GateStatus::Passed | GateStatus::Warned));

        match config.aggregation {
            AggregationMode::AllPass => {
                let score = results.iter().map(|r| r.score).sum::<f64>() / results.len() as f64;
                if any_failed {
                    (GateStatus::Failed, false, score)
                } else if any_warned {
                    (GateStatus::Warned, true, score)
                } else {
                    (GateStatus::Passed, true, score)
                }
            }
            AggregationMode::AnyPass => {
                let score = results
                    .iter()
                    .map(|r| r.score)
                    .fold(0.0f64, |acc, s| acc.max(s));
                if any_passed {
                    let status = if any_failed || any_warned {
                        GateStatus::Warned
                    } else {
                        GateStatus::Passed
                    };
                    (status, true, score)
                } else {
                    (GateStatus::Failed, false, score)
                }
            }
            AggregationMode::Weighted => {
                let mut weighted = 0.0f64;
                let mut total_weight = 0.0f64;
                for r in results {
                    let w = config.gate_weight(&r.gate_id);
                    weighted += r.score * w;
                    total_weight += w;
                }
                let score = if total_weight > 0.0 {
                    weighted / total_weight
                } else {
                    0.0
                };
                if score >= config.pass_threshold {
                    let status = if any_failed || any_warned {
                        GateStatus::Warned
                    } else {
                        GateStatus::Passed
                    };
                    (status, true, score)
                } else {
                    (GateStatus::Failed, false, score)
                }
            }
        }
    }
}

impl Default for GateOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}
