//! The backup checksum recipe.
//!
//! SHA-256 over every file in the tree except `backup-manifest.json`, in
//! filename-sorted order, updating the hash with the relative path bytes
//! and then the file content. The hex digest is lowercase.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use drift_core::errors::BackupError;

use super::manifest::MANIFEST_NAME;

/// Collect relative paths of every file under `root`, sorted.
pub fn collect_files(root: &Path) -> Result<Vec<PathBuf>, BackupError> {
    let mut files = Vec::new();
    collect_into(root, root, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_into(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), BackupError> {
    let entries = std::fs::read_dir(dir).map_err(|e| BackupError::BackupFailed {
        reason: format!("read {}: {e}", dir.display()),
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| BackupError::BackupFailed {
            reason: e.to_string(),
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_into(root, &path, out)?;
        } else if let Ok(rel) = path.strip_prefix(root) {
            out.push(rel.to_path_buf());
        }
    }
    Ok(())
}

/// Checksum a backup tree, excluding the manifest.
pub fn compute_tree_checksum(root: &Path) -> Result<String, BackupError> {
    let mut files = collect_files(root)?;
    files.retain(|f| f.file_name().map_or(true, |n| n != MANIFEST_NAME));
    files.sort();

    let mut hasher = Sha256::new();
    for rel in &files {
        // Relative path first, with forward slashes for portability.
        let rel_str = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        hasher.update(rel_str.as_bytes());
        let content = std::fs::read(root.join(rel)).map_err(|e| BackupError::BackupFailed {
            reason: format!("read {}: {e}", rel.display()),
        })?;
        hasher.update(&content);
    }
    Ok(hex(&hasher.finalize()))
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_is_stable_and_manifest_blind() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("a.json"), b"{}").unwrap();
        std::fs::write(dir.path().join("sub/b.json"), b"[]").unwrap();

        let first = compute_tree_checksum(dir.path()).unwrap();
        let second = compute_tree_checksum(dir.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

        // The manifest never participates.
        std::fs::write(dir.path().join(MANIFEST_NAME), b"manifest").unwrap();
        assert_eq!(compute_tree_checksum(dir.path()).unwrap(), first);

        // Content changes do.
        std::fs::write(dir.path().join("a.json"), b"{\"x\":1}").unwrap();
        assert_ne!(compute_tree_checksum(dir.path()).unwrap(), first);
    }

    #[test]
    fn renaming_a_file_changes_the_checksum() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), b"{}").unwrap();
        let before = compute_tree_checksum(dir.path()).unwrap();
        std::fs::rename(dir.path().join("a.json"), dir.path().join("b.json")).unwrap();
        let after = compute_tree_checksum(dir.path()).unwrap();
        assert_ne!(before, after);
    }
}
