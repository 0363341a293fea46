//! Workspace layout errors.

use super::error_code::{self, DriftErrorCode};

/// Errors raised by the `.drift/` workspace layer.
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("No workspace found starting from {start}")]
    NotFound { start: String },

    #[error("Workspace I/O failed at {path}: {message}")]
    Io { path: String, message: String },

    #[error("Malformed workspace artifact {path}: {message}")]
    Malformed { path: String, message: String },
}

impl DriftErrorCode for WorkspaceError {
    fn error_code(&self) -> &'static str {
        error_code::WORKSPACE_ERROR
    }
}
