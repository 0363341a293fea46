//! Checksum-verified workspace backups in `.drift-backups/`.

pub mod checksum;
pub mod manager;
pub mod manifest;

pub use checksum::compute_tree_checksum;
pub use manager::{BackupManager, BackupOptions, BackupResult};
pub use manifest::{BackupIndex, BackupManifest, BackupMetadata};
