//! Quality gates — named checks composed into a policy verdict.
//!
//! Each gate is a plug-in with the same shape: validate config, execute
//! against the shared input, produce a `GateResult`. The orchestrator runs
//! the configured policy's gates in id order and aggregates deterministically.

pub mod constraint_verification;
pub mod custom_rules;
pub mod impact_gate;
pub mod orchestrator;
pub mod pattern_compliance;
pub mod regression;
pub mod security_boundary;
pub mod types;

pub use orchestrator::GateOrchestrator;
pub use types::{
    ConfigValidation, ConstraintCheck, GateInput, GateResult, GateStatus, QualityGate,
    QualityGateResult, RunMetadata,
};

pub use constraint_verification::ConstraintVerificationGate;
pub use custom_rules::CustomRulesGate;
pub use impact_gate::ImpactSimulationGate;
pub use pattern_compliance::PatternComplianceGate;
pub use regression::RegressionDetectionGate;
pub use security_boundary::SecurityBoundaryGate;
