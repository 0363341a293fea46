//! Quality gate errors. A gate config error skips the gate, never fails the run.

use super::error_code::{self, DriftErrorCode};

/// Errors raised by the gate orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("Unknown gate: {id}")]
    UnknownGate { id: String },

    #[error("Invalid config for gate {id}: {errors:?}")]
    InvalidConfig { id: String, errors: Vec<String> },

    #[error("No baseline snapshot available")]
    MissingBaseline,
}

impl DriftErrorCode for GateError {
    fn error_code(&self) -> &'static str {
        error_code::GATE_ERROR
    }
}
