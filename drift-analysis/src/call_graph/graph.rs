//! The composed, immutable call graph and its lookups.

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::Direction;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::types::{CallSite, DataAccess, FunctionNode};

/// Graph health counters. Resolution rate never fails a build — it is a
/// reported metric only.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallGraphStats {
    pub function_count: usize,
    pub edge_count: usize,
    pub unresolved_edges: usize,
    pub entry_point_count: usize,
}

impl CallGraphStats {
    /// `edges_with_known_callee / total_edges`, 1.0 for an edgeless graph.
    pub fn resolution_rate(&self) -> f64 {
        let total = self.edge_count + self.unresolved_edges;
        if total == 0 {
            1.0
        } else {
            self.edge_count as f64 / total as f64
        }
    }
}

/// Immutable cross-language call graph.
pub struct CallGraph {
    pub(crate) graph: StableDiGraph<FunctionNode, CallSite>,
    pub(crate) ids: FxHashMap<String, NodeIndex>,
    by_file: FxHashMap<String, Vec<NodeIndex>>,
    by_name: FxHashMap<String, Vec<NodeIndex>>,
    entry_points: Vec<NodeIndex>,
    data_access: FxHashMap<String, Vec<DataAccess>>,
    stats: CallGraphStats,
}

impl CallGraph {
    pub(crate) fn new(
        graph: StableDiGraph<FunctionNode, CallSite>,
        ids: FxHashMap<String, NodeIndex>,
        data_access: FxHashMap<String, Vec<DataAccess>>,
        unresolved_edges: usize,
    ) -> Self {
        let mut by_file: FxHashMap<String, Vec<NodeIndex>> = FxHashMap::default();
        let mut by_name: FxHashMap<String, Vec<NodeIndex>> = FxHashMap::default();
        let mut entry_points = Vec::new();
        for idx in graph.node_indices() {
            let node = &graph[idx];
            by_file.entry(node.file.clone()).or_default().push(idx);
            by_name.entry(node.name.clone()).or_default().push(idx);
            if node.is_entry_point {
                entry_points.push(idx);
            }
        }
        let stats = CallGraphStats {
            function_count: graph.node_count(),
            edge_count: graph.edge_count(),
            unresolved_edges,
            entry_point_count: entry_points.len(),
        };
        Self {
            graph,
            ids,
            by_file,
            by_name,
            entry_points,
            data_access,
            stats,
        }
    }

    /// An empty graph, useful as the before-first-build snapshot.
    pub fn empty() -> Self {
        Self::new(
            StableDiGraph::default(),
            FxHashMap::default(),
            FxHashMap::default(),
            0,
        )
    }

    pub fn stats(&self) -> CallGraphStats {
        self.stats
    }

    pub fn function_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Look up a function by id.
    pub fn function(&self, id: &str) -> Option<&FunctionNode> {
        self.ids.get(id).map(|&idx| &self.graph[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    pub(crate) fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.ids.get(id).copied()
    }

    /// All functions defined in `file`, in definition order.
    pub fn functions_in_file(&self, file: &str) -> Vec<&FunctionNode> {
        let mut nodes: Vec<&FunctionNode> = self
            .by_file
            .get(file)
            .map(|idxs| idxs.iter().map(|&i| &self.graph[i]).collect())
            .unwrap_or_default();
        nodes.sort_by_key(|n| n.line);
        nodes
    }

    /// All functions with this (unqualified) name.
    pub fn functions_by_name(&self, name: &str) -> Vec<&FunctionNode> {
        self.by_name
            .get(name)
            .map(|idxs| idxs.iter().map(|&i| &self.graph[i]).collect())
            .unwrap_or_default()
    }

    /// Direct callers of `id`.
    pub fn callers(&self, id: &str) -> Vec<&FunctionNode> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Direct callees of `id`.
    pub fn callees(&self, id: &str) -> Vec<&FunctionNode> {
        self.neighbors(id, Direction::Outgoing)
    }

    fn neighbors(&self, id: &str, direction: Direction) -> Vec<&FunctionNode> {
        let Some(idx) = self.node_index(id) else {
            return Vec::new();
        };
        let mut seen = FxHashSet::default();
        self.graph
            .neighbors_directed(idx, direction)
            .filter(|n| seen.insert(*n))
            .map(|n| &self.graph[n])
            .collect()
    }

    /// All entry-point functions.
    pub fn entry_points(&self) -> Vec<&FunctionNode> {
        self.entry_points.iter().map(|&i| &self.graph[i]).collect()
    }

    /// Entry points that transitively reach `id` (inverse BFS, unbounded).
    pub fn entry_points_reaching(&self, id: &str) -> Vec<&FunctionNode> {
        let Some(start) = self.node_index(id) else {
            return Vec::new();
        };
        let mut visited = FxHashSet::default();
        let mut queue = std::collections::VecDeque::new();
        visited.insert(start);
        queue.push_back(start);
        let mut found = Vec::new();
        while let Some(node) = queue.pop_front() {
            if self.graph[node].is_entry_point && node != start {
                found.push(&self.graph[node]);
            }
            for caller in self.graph.neighbors_directed(node, Direction::Incoming) {
                if visited.insert(caller) {
                    queue.push_back(caller);
                }
            }
        }
        if self.graph[start].is_entry_point {
            found.push(&self.graph[start]);
        }
        found
    }

    /// Data-access overlay for a function, empty when it touches nothing.
    pub fn data_access(&self, id: &str) -> &[DataAccess] {
        self.data_access.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All function ids, sorted — deterministic iteration for scorers.
    pub fn function_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.ids.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
