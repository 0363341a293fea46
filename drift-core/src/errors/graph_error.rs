//! Call graph errors.

use super::error_code::{self, DriftErrorCode};

/// Errors raised while loading shards or composing the call graph.
#[derive(Debug, thiserror::Error)]
pub enum CallGraphError {
    #[error("Failed to read shard {path}: {message}")]
    ShardIo { path: String, message: String },

    #[error("Malformed shard {path}: {message}")]
    ShardMalformed { path: String, message: String },

    #[error("Unknown function: {id}")]
    UnknownFunction { id: String },
}

impl DriftErrorCode for CallGraphError {
    fn error_code(&self) -> &'static str {
        error_code::CALL_GRAPH_ERROR
    }
}
