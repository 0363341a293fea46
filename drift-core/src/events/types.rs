//! Pattern lifecycle event payloads.

use crate::types::Pattern;

/// Fire-and-forget events emitted by the pattern repository.
///
/// Mutation events carry the pattern as it stands after the write. Deletion
/// carries only `{id, category}` — the record is already gone.
#[derive(Debug, Clone)]
pub enum PatternEvent {
    Added(Pattern),
    Updated(Pattern),
    Deleted { id: String, category: String },
    Approved(Pattern),
    Ignored(Pattern),
    Loaded { count: usize },
    Saved { count: usize },
}

impl PatternEvent {
    /// Stable event name matching the wire vocabulary.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Added(_) => "pattern:added",
            Self::Updated(_) => "pattern:updated",
            Self::Deleted { .. } => "pattern:deleted",
            Self::Approved(_) => "pattern:approved",
            Self::Ignored(_) => "pattern:ignored",
            Self::Loaded { .. } => "patterns:loaded",
            Self::Saved { .. } => "patterns:saved",
        }
    }
}
