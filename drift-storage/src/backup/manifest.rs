//! Backup manifest and index shapes — stable compatibility surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MANIFEST_NAME: &str = "backup-manifest.json";
pub const INDEX_NAME: &str = "index.json";

/// `backup-manifest.json`, written last during creation. Field names and
/// semantics are a stable surface for external tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupManifest {
    pub id: String,
    pub drift_version: String,
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    pub reason: String,
    pub size_bytes: u64,
    /// SHA-256 (lowercase hex) of all files except this manifest.
    pub checksum: String,
    /// The workspace directory this backup was taken from.
    pub original_path: String,
    pub project_name: String,
    pub compressed: bool,
    /// Relative paths of every stored file.
    pub files: Vec<String>,
}

/// One row in `index.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupMetadata {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub reason: String,
    pub size_bytes: u64,
    /// SHA-256 (lowercase hex) of the backup tree, manifest excluded.
    pub checksum: String,
    pub compressed: bool,
}

/// `index.json` in the backup root: the listing/retention source of truth.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackupIndex {
    pub backups: Vec<BackupMetadata>,
}
