//! Backup creation, restore, listing, retention, and deletion.
//!
//! Creation and restore hold an exclusive file lock over `.drift-backups/`
//! for their whole duration; a concurrent attempt fails fast with
//! `BackupLocked`. Any mid-creation failure removes the partial backup
//! directory before the error is returned.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use drift_core::errors::BackupError;

use super::checksum::{collect_files, compute_tree_checksum};
use super::manifest::{BackupIndex, BackupManifest, BackupMetadata, INDEX_NAME, MANIFEST_NAME};
use crate::workspace::{Workspace, SCHEMA_VERSION};

/// Source subtrees never included in a backup: regenerable state.
const SKIP_PREFIXES: &[&str] = &["cache", "history/snapshots", ".backups"];

const LOCK_NAME: &str = ".lock";

/// Manager knobs.
#[derive(Debug, Clone)]
pub struct BackupOptions {
    pub max_backups: usize,
    pub compress: bool,
    pub auto_backup: bool,
}

impl Default for BackupOptions {
    fn default() -> Self {
        Self {
            max_backups: 10,
            compress: true,
            auto_backup: true,
        }
    }
}

/// Outcome of a successful creation.
#[derive(Debug, Clone)]
pub struct BackupResult {
    pub id: String,
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub file_count: usize,
    pub checksum: String,
}

/// Owns `.drift-backups/` beside the workspace.
pub struct BackupManager {
    workspace: Workspace,
    options: BackupOptions,
}

impl BackupManager {
    pub fn new(workspace: Workspace, options: BackupOptions) -> Self {
        Self { workspace, options }
    }

    fn backups_root(&self) -> PathBuf {
        self.workspace.backups_dir()
    }

    /// Exclusive lock over the backup store. Fails fast when contended.
    fn lock(&self) -> Result<fd_lock::RwLock<File>, BackupError> {
        let root = self.backups_root();
        std::fs::create_dir_all(&root).map_err(|e| BackupError::BackupFailed {
            reason: format!("create {}: {e}", root.display()),
        })?;
        let lock_file = File::create(root.join(LOCK_NAME)).map_err(|e| {
            BackupError::BackupFailed {
                reason: format!("open lock: {e}"),
            }
        })?;
        Ok(fd_lock::RwLock::new(lock_file))
    }

    /// The backup policy: operations whose lowercased name contains one of
    /// the destructive verbs warrant a backup when auto-backup is on.
    pub fn should_backup(&self, operation: &str) -> bool {
        if !self.options.auto_backup {
            return false;
        }
        let lower = operation.to_lowercase();
        ["upgrade", "migrate", "reset", "clean", "delete"]
            .iter()
            .any(|verb| lower.contains(verb))
    }

    /// Create a backup of the workspace. See the module docs for the
    /// transactional guarantees.
    pub fn create_backup(
        &self,
        reason: &str,
        drift_version: &str,
    ) -> Result<BackupResult, BackupError> {
        let mut lock = self.lock()?;
        let guard = lock.try_write().map_err(|_| BackupError::BackupLocked)?;
        let result = self.create_backup_locked(reason, drift_version);
        drop(guard);
        result
    }

    /// Restore a backup by id.
    ///
    /// Verifies the stored tree's checksum first, snapshots the current
    /// workspace as `pre_destructive_operation`, then restores each file,
    /// gunzipping `.gz` payloads on the fly.
    pub fn restore(&self, id: &str, drift_version: &str) -> Result<(), BackupError> {
        let mut lock = self.lock()?;
        let guard = lock.try_write().map_err(|_| BackupError::BackupLocked)?;
        let result = self.restore_locked(id, drift_version);
        drop(guard);
        result
    }

    /// All backups, newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupMetadata>, BackupError> {
        let mut backups = self.read_index()?.backups;
        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(backups)
    }

    /// Delete a backup. Requires the literal confirmation token `"DELETE"`.
    pub fn delete_backup(&self, id: &str, token: &str) -> Result<(), BackupError> {
        if token != "DELETE" {
            return Err(BackupError::ConfirmationRequired);
        }
        let mut lock = self.lock()?;
        let _guard = lock.try_write().map_err(|_| BackupError::BackupLocked)?;

        let mut index = self.read_index()?;
        let Some(position) = index.backups.iter().position(|b| b.id == id) else {
            return Err(BackupError::BackupNotFound { id: id.to_string() });
        };
        let removed = index.backups.remove(position);
        let dir = self.backups_root().join(&removed.name);
        if dir.exists() {
            std::fs::remove_dir_all(&dir).map_err(|e| BackupError::BackupFailed {
                reason: format!("remove {}: {e}", dir.display()),
            })?;
        }
        self.write_index(&index)
    }

    // ---- creation internals ----

    fn create_backup_locked(
        &self,
        reason: &str,
        drift_version: &str,
    ) -> Result<BackupResult, BackupError> {
        let backup_id = short_uuid();
        let backup_name = format!("backup-{}-{reason}", Utc::now().format("%Y%m%d%H%M%S%6f"));
        let backup_dir = self.backups_root().join(&backup_name);

        match self.populate_backup(&backup_dir, &backup_id, reason, drift_version) {
            Ok(result) => {
                self.enforce_retention()?;
                Ok(result)
            }
            Err(e) => {
                // No partial backups: remove whatever was written.
                if backup_dir.exists() {
                    let _ = std::fs::remove_dir_all(&backup_dir);
                }
                Err(e)
            }
        }
    }

    fn populate_backup(
        &self,
        backup_dir: &Path,
        backup_id: &str,
        reason: &str,
        drift_version: &str,
    ) -> Result<BackupResult, BackupError> {
        let source_root = self.workspace.root();
        if !source_root.is_dir() {
            return Err(BackupError::BackupFailed {
                reason: format!("no workspace at {}", source_root.display()),
            });
        }
        std::fs::create_dir_all(backup_dir).map_err(|e| BackupError::BackupFailed {
            reason: format!("create {}: {e}", backup_dir.display()),
        })?;

        let mut sources = collect_files(&source_root)?;
        sources.retain(|rel| {
            let rel_str = rel.to_string_lossy().replace('\\', "/");
            !SKIP_PREFIXES.iter().any(|p| rel_str.starts_with(p))
        });
        sources.sort();

        let mut size_bytes = 0u64;
        let mut stored_files = Vec::with_capacity(sources.len());
        for rel in &sources {
            let source = source_root.join(rel);
            let is_json = rel.extension().is_some_and(|e| e == "json");
            let stored_rel = if is_json && self.options.compress {
                let mut with_gz = rel.clone().into_os_string();
                with_gz.push(".gz");
                PathBuf::from(with_gz)
            } else {
                rel.clone()
            };
            let destination = backup_dir.join(&stored_rel);
            if let Some(parent) = destination.parent() {
                std::fs::create_dir_all(parent).map_err(|e| BackupError::BackupFailed {
                    reason: format!("create {}: {e}", parent.display()),
                })?;
            }

            if is_json && self.options.compress {
                let content = std::fs::read(&source).map_err(|e| BackupError::BackupFailed {
                    reason: format!("read {}: {e}", source.display()),
                })?;
                let file = File::create(&destination).map_err(|e| BackupError::BackupFailed {
                    reason: format!("create {}: {e}", destination.display()),
                })?;
                let mut encoder = GzEncoder::new(file, Compression::default());
                encoder.write_all(&content).map_err(|e| BackupError::BackupFailed {
                    reason: format!("gzip {}: {e}", destination.display()),
                })?;
                encoder.finish().map_err(|e| BackupError::BackupFailed {
                    reason: format!("gzip {}: {e}", destination.display()),
                })?;
            } else {
                std::fs::copy(&source, &destination).map_err(|e| BackupError::BackupFailed {
                    reason: format!("copy {}: {e}", source.display()),
                })?;
            }

            let written = std::fs::metadata(&destination)
                .map(|m| m.len())
                .unwrap_or(0);
            size_bytes += written;
            stored_files.push(stored_rel.to_string_lossy().replace('\\', "/"));
        }

        let checksum = compute_tree_checksum(backup_dir)?;

        let manifest = BackupManifest {
            id: backup_id.to_string(),
            drift_version: drift_version.to_string(),
            schema_version: SCHEMA_VERSION,
            created_at: Utc::now(),
            reason: reason.to_string(),
            size_bytes,
            checksum: checksum.clone(),
            original_path: source_root.display().to_string(),
            project_name: self
                .workspace
                .project_root()
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            compressed: self.options.compress,
            files: stored_files.clone(),
        };
        let manifest_json =
            serde_json::to_vec_pretty(&manifest).map_err(|e| BackupError::BackupFailed {
                reason: format!("serialize manifest: {e}"),
            })?;
        std::fs::write(backup_dir.join(MANIFEST_NAME), manifest_json).map_err(|e| {
            BackupError::BackupFailed {
                reason: format!("write manifest: {e}"),
            }
        })?;

        let backup_name = backup_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let mut index = self.read_index()?;
        index.backups.push(BackupMetadata {
            id: backup_id.to_string(),
            name: backup_name.clone(),
            created_at: manifest.created_at,
            reason: reason.to_string(),
            size_bytes,
            checksum: checksum.clone(),
            compressed: self.options.compress,
        });
        self.write_index(&index)?;

        Ok(BackupResult {
            id: backup_id.to_string(),
            name: backup_name,
            path: backup_dir.to_path_buf(),
            size_bytes,
            file_count: stored_files.len(),
            checksum,
        })
    }

    /// Strictly more than `max_backups` triggers deletion of the oldest.
    fn enforce_retention(&self) -> Result<(), BackupError> {
        let mut index = self.read_index()?;
        while index.backups.len() > self.options.max_backups {
            let oldest_position = index
                .backups
                .iter()
                .enumerate()
                .min_by_key(|(_, b)| b.created_at)
                .map(|(i, _)| i);
            let Some(position) = oldest_position else { break };
            let removed = index.backups.remove(position);
            let dir = self.backups_root().join(&removed.name);
            if dir.exists() {
                std::fs::remove_dir_all(&dir).map_err(|e| BackupError::BackupFailed {
                    reason: format!("retention remove {}: {e}", dir.display()),
                })?;
            }
            tracing::debug!(backup = %removed.name, "retention removed oldest backup");
        }
        self.write_index(&index)
    }

    // ---- restore internals ----

    fn restore_locked(&self, id: &str, drift_version: &str) -> Result<(), BackupError> {
        let index = self.read_index()?;
        let entry = index
            .backups
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| BackupError::BackupNotFound { id: id.to_string() })?;
        let backup_dir = self.backups_root().join(&entry.name);

        let manifest: BackupManifest = {
            let content = std::fs::read_to_string(backup_dir.join(MANIFEST_NAME)).map_err(|e| {
                BackupError::BackupFailed {
                    reason: format!("read manifest: {e}"),
                }
            })?;
            serde_json::from_str(&content).map_err(|e| BackupError::BackupFailed {
                reason: format!("parse manifest: {e}"),
            })?
        };

        // Integrity first: refuse to restore a tampered or truncated backup.
        let actual = compute_tree_checksum(&backup_dir)?;
        if actual != manifest.checksum {
            return Err(BackupError::BackupIntegrityFailed {
                expected: manifest.checksum,
                actual,
            });
        }

        // Snapshot current state before the destructive overwrite.
        self.create_backup_locked("pre_destructive_operation", drift_version)?;
        if !backup_dir.is_dir() {
            // Retention during the snapshot evicted the backup being restored.
            return Err(BackupError::BackupFailed {
                reason: format!("backup {} was evicted by retention mid-restore", entry.name),
            });
        }

        let target_root = self.workspace.root();
        for stored in &manifest.files {
            let stored_path = backup_dir.join(stored);
            // Only payloads the backup itself gzipped are decompressed; a
            // genuine `.gz` workspace file is copied back verbatim.
            let (target_rel, compressed) = match stored.strip_suffix(".gz") {
                Some(original) if manifest.compressed && original.ends_with(".json") => {
                    (original.to_string(), true)
                }
                _ => (stored.clone(), false),
            };
            let target = target_root.join(&target_rel);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(|e| BackupError::BackupFailed {
                    reason: format!("create {}: {e}", parent.display()),
                })?;
            }
            if compressed {
                let file = File::open(&stored_path).map_err(|e| BackupError::BackupFailed {
                    reason: format!("open {}: {e}", stored_path.display()),
                })?;
                let mut decoder = GzDecoder::new(file);
                let mut content = Vec::new();
                decoder
                    .read_to_end(&mut content)
                    .map_err(|e| BackupError::BackupFailed {
                        reason: format!("gunzip {}: {e}", stored_path.display()),
                    })?;
                std::fs::write(&target, content).map_err(|e| BackupError::BackupFailed {
                    reason: format!("write {}: {e}", target.display()),
                })?;
            } else {
                std::fs::copy(&stored_path, &target).map_err(|e| BackupError::BackupFailed {
                    reason: format!("restore {}: {e}", target.display()),
                })?;
            }
        }
        Ok(())
    }

    // ---- index I/O ----

    fn read_index(&self) -> Result<BackupIndex, BackupError> {
        let path = self.backups_root().join(INDEX_NAME);
        if !path.exists() {
            return Ok(BackupIndex::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| BackupError::BackupFailed {
            reason: format!("read index: {e}"),
        })?;
        serde_json::from_str(&content).map_err(|e| BackupError::BackupFailed {
            reason: format!("parse index: {e}"),
        })
    }

    fn write_index(&self, index: &BackupIndex) -> Result<(), BackupError> {
        let path = self.backups_root().join(INDEX_NAME);
        let json = serde_json::to_vec_pretty(index).map_err(|e| BackupError::BackupFailed {
            reason: format!("serialize index: {e}"),
        })?;
        crate::workspace::write_atomic(&path, &json).map_err(|e| BackupError::BackupFailed {
            reason: e.to_string(),
        })
    }
}

/// First 8 hex chars of a v4 UUID — short but collision-safe enough for a
/// per-project backup store.
fn short_uuid() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}
