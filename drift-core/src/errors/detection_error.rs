//! Detection errors. Contained by the run loop, never fatal to a pass.

use super::error_code::{self, DriftErrorCode};

/// Errors that can occur inside a detector or the detector framework.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("Detector already registered: {id}")]
    DetectorAlreadyRegistered { id: String },

    #[error("Detector not found: {id}")]
    DetectorNotFound { id: String },

    #[error("Detector {id} failed to load: {message}")]
    LoadFailed { id: String, message: String },

    #[error("Detector {id} reported an invalid location: {message}")]
    InvalidLocation { id: String, message: String },

    #[error("Detector {id} failed: {message}")]
    DetectorFailure { id: String, message: String },

    #[error("Invalid detector config: {message}")]
    InvalidConfig { message: String },
}

impl DriftErrorCode for DetectionError {
    fn error_code(&self) -> &'static str {
        error_code::DETECTION_ERROR
    }
}
