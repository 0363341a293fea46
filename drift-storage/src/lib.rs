//! Persistence layer for the Drift engine.
//!
//! Owns every durable artifact: the `.drift/` workspace tree, the pattern
//! repository with its status-directory JSON store, the adapter over the
//! legacy store, and checksum-verified backups in `.drift-backups/`.
//! Components mutate only via repository-scoped operations and tolerate
//! restart at any point — writes go through temp-file-then-rename.

pub mod backup;
pub mod legacy;
pub mod repository;
pub mod workspace;

pub use backup::{BackupManager, BackupManifest, BackupMetadata, BackupResult};
pub use repository::{PatternFilter, PatternRepository, QueryOptions, QueryResult, SortField};
pub use workspace::Workspace;
