//! Pattern repository errors. These propagate to callers unchanged.

use super::error_code::{self, DriftErrorCode};

/// Errors raised by the pattern repository and the legacy-store adapter.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("Repository not initialized — call initialize() first")]
    NotInitialized,

    #[error("Pattern not found: {id}")]
    PatternNotFound { id: String },

    #[error("Pattern already exists: {id}")]
    PatternAlreadyExists { id: String },

    #[error("Invalid status transition for {id}: {from} -> {to}")]
    InvalidStatusTransition {
        id: String,
        from: String,
        to: String,
    },

    #[error("Pattern store I/O failed: {message}")]
    StoreIo { message: String },

    #[error("Pattern record malformed: {message}")]
    Malformed { message: String },
}

impl DriftErrorCode for PatternError {
    fn error_code(&self) -> &'static str {
        error_code::PATTERN_ERROR
    }
}
