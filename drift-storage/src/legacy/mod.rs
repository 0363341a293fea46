//! Legacy pattern store and the adapter that bridges it to the unified
//! repository surface.
//!
//! The legacy store predates the unified pattern model: its own record
//! shape, its own state names, its own transition error, and skinny
//! `{patternId, category}` event payloads. The adapter is authoritative
//! for unified event emission.

pub mod adapter;
pub mod store;

pub use adapter::LegacyStoreAdapter;
pub use store::{LegacyChange, LegacyChangeKind, LegacyPatternStore, LegacyRecord, LegacyStoreError};
