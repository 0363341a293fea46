//! The `.drift/` workspace: discovery, layout, atomic JSON writes.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use drift_core::errors::WorkspaceError;

/// Current on-disk schema version, stored in `config.json`.
pub const SCHEMA_VERSION: u32 = 2;

/// Workspace-level config written at initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    pub schema_version: u32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Handle to a discovered or initialized `.drift/` workspace.
#[derive(Debug, Clone)]
pub struct Workspace {
    project_root: PathBuf,
}

impl Workspace {
    pub const DIR_NAME: &'static str = ".drift";

    /// Discovery order: explicit argument → `DRIFT_PROJECT_ROOT` → nearest
    /// ancestor containing `.drift/` → current working directory.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, WorkspaceError> {
        if let Some(root) = explicit {
            return Ok(Self {
                project_root: root.to_path_buf(),
            });
        }
        if let Some(root) = std::env::var_os("DRIFT_PROJECT_ROOT") {
            return Ok(Self {
                project_root: PathBuf::from(root),
            });
        }
        let cwd = std::env::current_dir().map_err(|e| WorkspaceError::Io {
            path: ".".to_string(),
            message: e.to_string(),
        })?;
        let mut dir: Option<&Path> = Some(cwd.as_path());
        while let Some(candidate) = dir {
            if candidate.join(Self::DIR_NAME).is_dir() {
                return Ok(Self {
                    project_root: candidate.to_path_buf(),
                });
            }
            dir = candidate.parent();
        }
        Ok(Self { project_root: cwd })
    }

    /// A workspace rooted at an explicit project directory.
    pub fn at(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// `.drift/` itself.
    pub fn root(&self) -> PathBuf {
        self.project_root.join(Self::DIR_NAME)
    }

    pub fn exists(&self) -> bool {
        self.root().is_dir()
    }

    /// Create the full workspace tree and stamp the schema version.
    /// Idempotent: an existing tree is left untouched.
    pub fn initialize(&self) -> Result<(), WorkspaceError> {
        for dir in [
            self.root(),
            self.patterns_dir("discovered"),
            self.patterns_dir("approved"),
            self.patterns_dir("ignored"),
            self.callgraph_dir(),
            self.views_dir(),
            self.snapshots_dir(),
            self.cache_dir(),
        ] {
            std::fs::create_dir_all(&dir).map_err(|e| WorkspaceError::Io {
                path: dir.display().to_string(),
                message: e.to_string(),
            })?;
        }
        let config_path = self.config_path();
        if !config_path.exists() {
            let config = WorkspaceConfig {
                schema_version: SCHEMA_VERSION,
                created_at: chrono::Utc::now(),
            };
            self.write_json(&config_path, &config)?;
        }
        Ok(())
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("config.json")
    }

    /// `patterns/{discovered|approved|ignored}/`.
    pub fn patterns_dir(&self, status: &str) -> PathBuf {
        self.root().join("patterns").join(status)
    }

    /// Call-graph shard directory: `lake/callgraph/files/`.
    pub fn callgraph_dir(&self) -> PathBuf {
        self.root().join("lake").join("callgraph").join("files")
    }

    /// Derived JSON views, regenerable.
    pub fn views_dir(&self) -> PathBuf {
        self.root().join("views")
    }

    /// Health snapshots: `history/snapshots/`.
    pub fn snapshots_dir(&self) -> PathBuf {
        self.root().join("history").join("snapshots")
    }

    /// Regenerable cache, skipped by backups.
    pub fn cache_dir(&self) -> PathBuf {
        self.root().join("cache")
    }

    /// Backups live beside the workspace, not inside it.
    pub fn backups_dir(&self) -> PathBuf {
        self.project_root.join(".drift-backups")
    }

    /// Atomic JSON write: temp file in the same directory, then rename.
    /// Readers of the old file keep a consistent (possibly stale) view.
    pub fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), WorkspaceError> {
        let json = serde_json::to_vec_pretty(value).map_err(|e| WorkspaceError::Malformed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        write_atomic(path, &json)
    }

    /// Persist a health snapshot under `history/snapshots/`, named by its
    /// timestamp. Snapshots are immutable once written.
    pub fn write_snapshot(
        &self,
        snapshot: &drift_core::types::HealthSnapshot,
    ) -> Result<PathBuf, WorkspaceError> {
        let name = format!(
            "snapshot-{}.json",
            snapshot.timestamp.format("%Y%m%d%H%M%S%6f")
        );
        let path = self.snapshots_dir().join(name);
        self.write_json(&path, snapshot)?;
        Ok(path)
    }

    /// The most recent snapshot, used as the regression baseline.
    /// Unreadable snapshots are skipped, not fatal.
    pub fn load_baseline(&self) -> Option<drift_core::types::HealthSnapshot> {
        let dir = self.snapshots_dir();
        let mut paths: Vec<PathBuf> = std::fs::read_dir(&dir)
            .ok()?
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|e| e == "json"))
            .collect();
        paths.sort();
        for path in paths.into_iter().rev() {
            match self.read_json::<drift_core::types::HealthSnapshot>(&path) {
                Ok(snapshot) => return Some(snapshot),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable snapshot");
                }
            }
        }
        None
    }

    /// Read and parse a JSON artifact.
    pub fn read_json<T: for<'de> Deserialize<'de>>(&self, path: &Path) -> Result<T, WorkspaceError> {
        let content = std::fs::read_to_string(path).map_err(|e| WorkspaceError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| WorkspaceError::Malformed {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Temp-file-then-rename write shared by the repository and views.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), WorkspaceError> {
    let parent = path.parent().ok_or_else(|| WorkspaceError::Io {
        path: path.display().to_string(),
        message: "no parent directory".to_string(),
    })?;
    std::fs::create_dir_all(parent).map_err(|e| WorkspaceError::Io {
        path: parent.display().to_string(),
        message: e.to_string(),
    })?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, bytes).map_err(|e| WorkspaceError::Io {
        path: tmp.display().to_string(),
        message: e.to_string(),
    })?;
    std::fs::rename(&tmp, path).map_err(|e| WorkspaceError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
