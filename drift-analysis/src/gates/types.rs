//! The gate contract and result envelopes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use drift_core::types::{HealthSnapshot, Pattern, Violation};

use crate::call_graph::CallGraph;

/// Gate verdicts. `Skipped` never appears as a policy verdict — skipped
/// gates are listed in run metadata instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateStatus {
    Passed,
    Warned,
    Failed,
    Skipped,
}

impl GateStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Warned => "warned",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

/// One pre-evaluated architectural constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintCheck {
    pub id: String,
    pub description: String,
    pub satisfied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

/// Everything a gate may consume. Built once per run by the orchestrator's
/// caller; gates read, never mutate.
#[derive(Clone, Default)]
pub struct GateInput {
    pub patterns: Vec<Pattern>,
    pub baseline: Option<HealthSnapshot>,
    pub changed_files: Vec<String>,
    pub all_files: Vec<String>,
    pub constraints: Vec<ConstraintCheck>,
    pub graph: Option<Arc<CallGraph>>,
}

/// Config validation outcome.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ConfigValidation {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn fail(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
        }
    }
}

/// What one gate produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateResult {
    pub gate_id: String,
    pub gate_name: String,
    pub status: GateStatus,
    pub passed: bool,
    pub score: f64,
    pub summary: String,
    pub violations: Vec<Violation>,
    pub warnings: Vec<String>,
    pub execution_time_ms: u64,
    pub details: serde_json::Value,
}

impl GateResult {
    pub fn pass(gate_id: &str, gate_name: &str, score: f64, summary: impl Into<String>) -> Self {
        Self {
            gate_id: gate_id.to_string(),
            gate_name: gate_name.to_string(),
            status: GateStatus::Passed,
            passed: true,
            score: score.clamp(0.0, 100.0),
            summary: summary.into(),
            violations: Vec::new(),
            warnings: Vec::new(),
            execution_time_ms: 0,
            details: serde_json::Value::Null,
        }
    }

    pub fn warn(
        gate_id: &str,
        gate_name: &str,
        score: f64,
        summary: impl Into<String>,
        warnings: Vec<String>,
    ) -> Self {
        Self {
            status: GateStatus::Warned,
            warnings,
            ..Self::pass(gate_id, gate_name, score, summary)
        }
    }

    pub fn fail(
        gate_id: &str,
        gate_name: &str,
        score: f64,
        summary: impl Into<String>,
        violations: Vec<Violation>,
    ) -> Self {
        Self {
            status: GateStatus::Failed,
            passed: false,
            violations,
            ..Self::pass(gate_id, gate_name, score, summary)
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }
}

/// Bookkeeping on the overall result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    pub gates_run: Vec<String>,
    pub gates_skipped: Vec<String>,
    pub duration_ms: u64,
}

/// The stable envelope every gate run produces — even catastrophic failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityGateResult {
    pub status: GateStatus,
    pub passed: bool,
    pub score: f64,
    pub gates: Vec<GateResult>,
    pub violations: Vec<Violation>,
    pub warnings: Vec<String>,
    pub metadata: RunMetadata,
}

impl QualityGateResult {
    /// The deterministic failure envelope: CI always sees a verdict, even
    /// when the orchestrator itself blows up.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self {
            status: GateStatus::Failed,
            passed: false,
            score: 0.0,
            gates: Vec::new(),
            violations: Vec::new(),
            warnings: vec![message.into()],
            metadata: RunMetadata::default(),
        }
    }
}

/// The contract every gate implements.
pub trait QualityGate: Send + Sync {
    /// Stable id; gates execute in id order.
    fn id(&self) -> &'static str;
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;

    fn execute(&self, input: &GateInput, config: &serde_json::Value) -> GateResult;

    fn validate_config(&self, config: &serde_json::Value) -> ConfigValidation;

    fn default_config(&self) -> serde_json::Value;
}
