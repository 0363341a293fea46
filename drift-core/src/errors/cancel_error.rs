//! Cooperative abort errors. Partial results are discarded by the caller.

use super::error_code::{self, DriftErrorCode};

/// Raised at cooperative yield points when a run is cancelled or over budget.
#[derive(Debug, thiserror::Error)]
pub enum CancelError {
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Operation timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },
}

impl DriftErrorCode for CancelError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Cancelled => error_code::CANCELLED,
            Self::Timeout { .. } => error_code::TIMEOUT,
        }
    }
}
