//! Shard loading and graph composition.
//!
//! Shards are parsed in parallel, then merged on one thread into the
//! immutable graph. Edges whose callee never resolves to a known node are
//! counted against the resolution rate and dropped.

use std::path::Path;
use std::sync::Arc;

use petgraph::stable_graph::StableDiGraph;
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use drift_core::errors::CallGraphError;

use super::graph::CallGraph;
use super::types::{CallSite, DataAccess, EntryPointInfo, FunctionKind, FunctionNode};

/// One per-file shard as the external producer writes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardFile {
    pub file: String,
    #[serde(default)]
    pub functions: Vec<ShardFunction>,
    #[serde(default)]
    pub calls: Vec<ShardCall>,
}

/// A function record inside a shard. `id` is optional; when absent the
/// stable `"<file>:<name>"` form is synthesized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardFunction {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub line: u32,
    #[serde(rename = "type", default)]
    pub kind: FunctionKind,
    #[serde(default)]
    pub is_entry_point: bool,
    #[serde(default)]
    pub accesses_sensitive_data: bool,
    #[serde(default)]
    pub entry_point: Option<EntryPointInfo>,
    #[serde(default)]
    pub data_access: Vec<DataAccess>,
}

/// A call record inside a shard. `callee` may be an id or a bare name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardCall {
    pub caller: String,
    pub callee: String,
    pub line: u32,
}

/// Composes shards into a [`CallGraph`].
#[derive(Default)]
pub struct CallGraphBuilder {
    shards: Vec<ShardFile>,
    fingerprint: u64,
}

impl CallGraphBuilder {
    pub fn new() -> Self {
        Self {
            shards: Vec::new(),
            fingerprint: 0,
        }
    }

    /// Add a pre-parsed shard.
    pub fn add_shard(&mut self, shard: ShardFile) -> &mut Self {
        self.shards.push(shard);
        self
    }

    /// xxh3 fingerprint of the raw shard bytes seen by `load_dir`.
    /// A rebuild can be skipped when the lake fingerprint is unchanged.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Load every `*.json` shard under `dir`. Parsing runs in parallel;
    /// unreadable shards are errors (a corrupt lake should not silently
    /// shrink the graph).
    pub fn load_dir(&mut self, dir: &Path) -> Result<&mut Self, CallGraphError> {
        let mut paths: Vec<std::path::PathBuf> = std::fs::read_dir(dir)
            .map_err(|e| CallGraphError::ShardIo {
                path: dir.display().to_string(),
                message: e.to_string(),
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let parsed: Vec<Result<(ShardFile, u64), CallGraphError>> = paths
            .par_iter()
            .map(|path| {
                let content =
                    std::fs::read_to_string(path).map_err(|e| CallGraphError::ShardIo {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    })?;
                let hash = xxhash_rust::xxh3::xxh3_64(content.as_bytes());
                let shard = serde_json::from_str(&content).map_err(|e| {
                    CallGraphError::ShardMalformed {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    }
                })?;
                Ok((shard, hash))
            })
            .collect();

        for shard in parsed {
            let (shard, hash) = shard?;
            self.fingerprint ^= hash;
            self.shards.push(shard);
        }
        Ok(self)
    }

    /// Merge all shards into an immutable graph.
    pub fn build(&self) -> Arc<CallGraph> {
        let mut graph = StableDiGraph::default();
        let mut ids = FxHashMap::default();
        let mut data_access: FxHashMap<String, Vec<DataAccess>> = FxHashMap::default();
        // Name index for resolving bare-name callees.
        let mut by_name: FxHashMap<&str, Vec<String>> = FxHashMap::default();

        for shard in &self.shards {
            for func in &shard.functions {
                let id = func
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("{}:{}", shard.file, func.name));
                if ids.contains_key(&id) {
                    continue; // First shard wins on duplicate ids.
                }
                let node = FunctionNode {
                    id: id.clone(),
                    file: shard.file.clone(),
                    name: func.name.clone(),
                    line: func.line,
                    kind: func.kind,
                    is_entry_point: func.is_entry_point,
                    accesses_sensitive_data: func.accesses_sensitive_data
                        || !func.data_access.is_empty(),
                    entry_point: func.entry_point.clone(),
                };
                let idx = graph.add_node(node);
                ids.insert(id.clone(), idx);
                by_name.entry(func.name.as_str()).or_default().push(id.clone());
                if !func.data_access.is_empty() {
                    data_access.insert(id, func.data_access.clone());
                }
            }
        }

        let mut seen_edges: FxHashSet<(String, String, String, u32)> = FxHashSet::default();
        let mut unresolved = 0usize;
        for shard in &self.shards {
            for call in &shard.calls {
                let caller_id = if ids.contains_key(&call.caller) {
                    call.caller.clone()
                } else {
                    format!("{}:{}", shard.file, call.caller)
                };
                let Some(&caller_idx) = ids.get(&caller_id) else {
                    unresolved += 1;
                    continue;
                };
                // Resolve callee: exact id, same-file name, then unique global name.
                let callee_id = if ids.contains_key(&call.callee) {
                    Some(call.callee.clone())
                } else {
                    let local = format!("{}:{}", shard.file, call.callee);
                    if ids.contains_key(&local) {
                        Some(local)
                    } else {
                        match by_name.get(call.callee.as_str()) {
                            Some(candidates) if candidates.len() == 1 => {
                                Some(candidates[0].clone())
                            }
                            _ => None,
                        }
                    }
                };
                let Some(callee_id) = callee_id else {
                    unresolved += 1;
                    continue;
                };
                let callee_idx = ids[&callee_id];
                if !seen_edges.insert((
                    caller_id,
                    callee_id,
                    shard.file.clone(),
                    call.line,
                )) {
                    continue; // Parallel edge at the same call site.
                }
                graph.add_edge(
                    caller_idx,
                    callee_idx,
                    CallSite {
                        file: shard.file.clone(),
                        line: call.line,
                    },
                );
            }
        }

        Arc::new(CallGraph::new(graph, ids, data_access, unresolved))
    }
}
