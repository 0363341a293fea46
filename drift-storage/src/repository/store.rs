//! File persistence for patterns: one JSON per pattern, grouped by status
//! directory. Saves are transactional at the file level; loads are tolerant.

use std::path::PathBuf;

use rustc_hash::FxHashSet;

use drift_core::errors::PatternError;
use drift_core::types::{Pattern, PatternStatus};

use crate::workspace::{write_atomic, Workspace};

const STATUS_DIRS: &[(&str, PatternStatus)] = &[
    ("discovered", PatternStatus::Discovered),
    ("approved", PatternStatus::Approved),
    ("ignored", PatternStatus::Ignored),
];

/// File-system-safe file name for a pattern id.
///
/// Ids needing sanitization get a digest suffix so distinct ids ("a/b" and
/// "a.b") cannot collide on the same file.
fn file_name(id: &str) -> String {
    let needs_sanitizing = !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !needs_sanitizing {
        return format!("{id}.json");
    }
    let safe: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(id.as_bytes());
    let tag: String = digest.iter().take(4).map(|b| format!("{b:02x}")).collect();
    format!("{safe}-{tag}.json")
}

fn pattern_path(workspace: &Workspace, p: &Pattern) -> PathBuf {
    workspace.patterns_dir(p.status.name()).join(file_name(&p.id))
}

/// Write every pattern into its status directory and prune files that no
/// longer correspond to a live pattern (deleted, or moved across statuses).
pub fn save_all(workspace: &Workspace, patterns: &[Pattern]) -> Result<(), PatternError> {
    let live: FxHashSet<PathBuf> = patterns
        .iter()
        .map(|p| pattern_path(workspace, p))
        .collect();

    for pattern in patterns {
        let path = pattern_path(workspace, pattern);
        let json = serde_json::to_vec_pretty(pattern).map_err(|e| PatternError::Malformed {
            message: format!("{}: {e}", pattern.id),
        })?;
        write_atomic(&path, &json).map_err(|e| PatternError::StoreIo {
            message: e.to_string(),
        })?;
    }

    for (dir_name, _) in STATUS_DIRS {
        let dir = workspace.patterns_dir(dir_name);
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") && !live.contains(&path) {
                if let Err(e) = std::fs::remove_file(&path) {
                    tracing::warn!(path = %path.display(), error = %e, "failed to prune stale pattern file");
                }
            }
        }
    }
    Ok(())
}

/// Load all patterns from the status directories.
///
/// Unreadable or malformed files are skipped with a warning — a corrupt
/// record must not take the repository down.
pub fn load_all(workspace: &Workspace) -> Vec<Pattern> {
    let mut patterns = Vec::new();
    for (dir_name, dir_status) in STATUS_DIRS {
        let dir = workspace.patterns_dir(dir_name);
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|e| e == "json"))
            .collect();
        paths.sort();

        for path in paths {
            let content = match std::fs::read_to_string(&path) {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable pattern file");
                    continue;
                }
            };
            match serde_json::from_str::<Pattern>(&content) {
                Ok(pattern) => {
                    if pattern.status != *dir_status {
                        tracing::warn!(
                            path = %path.display(),
                            "pattern status disagrees with its directory; record wins"
                        );
                    }
                    patterns.push(pattern);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping malformed pattern file");
                }
            }
        }
    }
    patterns
}
