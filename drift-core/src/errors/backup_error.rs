//! Backup manager errors. Creation and restore are transactional:
//! any failure aborts and removes the partial backup directory.

use super::error_code::{self, DriftErrorCode};

/// Errors raised by the workspace backup manager.
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("Backup failed: {reason}")]
    BackupFailed { reason: String },

    #[error("Backup integrity check failed: expected {expected}, got {actual}")]
    BackupIntegrityFailed { expected: String, actual: String },

    #[error("Backup store is locked by another operation")]
    BackupLocked,

    #[error("Backup not found: {id}")]
    BackupNotFound { id: String },

    #[error("Deletion requires the literal confirmation token \"DELETE\"")]
    ConfirmationRequired,
}

impl DriftErrorCode for BackupError {
    fn error_code(&self) -> &'static str {
        error_code::BACKUP_ERROR
    }
}
