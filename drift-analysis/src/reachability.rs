//! Reachability engine — depth-bounded BFS over the call graph.
//!
//! Forward: "what does X transitively call, touching what data?"
//! Backward: "who reaches X?" De-duplication is by target node id, so on
//! cycles the first (shortest) path wins. Traversal is non-yielding but
//! bounded by `max_depth`.

use petgraph::Direction;
use rustc_hash::FxHashSet;

use crate::call_graph::{CallGraph, DataAccess, FunctionNode};

/// Traversal direction over call edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalDirection {
    Forward,
    Backward,
}

/// Query parameters. `max_depth` defaults to 10 and bounds runtime.
pub struct ReachabilityQuery {
    pub direction: TraversalDirection,
    pub max_depth: u32,
    /// Only emit reaches whose node carries a sensitive data access.
    pub sensitive_only: bool,
    /// Stop expanding below a node when this returns true.
    pub stop: Option<Box<dyn Fn(&FunctionNode) -> bool>>,
}

impl ReachabilityQuery {
    pub const DEFAULT_MAX_DEPTH: u32 = 10;

    pub fn forward() -> Self {
        Self {
            direction: TraversalDirection::Forward,
            max_depth: Self::DEFAULT_MAX_DEPTH,
            sensitive_only: false,
            stop: None,
        }
    }

    pub fn backward() -> Self {
        Self {
            direction: TraversalDirection::Backward,
            ..Self::forward()
        }
    }

    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn sensitive_only(mut self) -> Self {
        self.sensitive_only = true;
        self
    }
}

/// One reached node: the shortest path from the source (inclusive at both
/// ends), the data access that triggered emission if any, and the depth.
#[derive(Debug, Clone)]
pub struct Reach {
    pub path: Vec<String>,
    pub access: Option<DataAccess>,
    pub depth: u32,
}

/// Stateless BFS engine over an immutable graph snapshot.
pub struct ReachabilityEngine;

impl ReachabilityEngine {
    /// Traverse from `start`. The source itself is emitted at depth 0.
    /// Unknown start ids yield an empty result.
    pub fn traverse(graph: &CallGraph, start: &str, query: &ReachabilityQuery) -> Vec<Reach> {
        let Some(start_idx) = graph.node_index(start) else {
            return Vec::new();
        };
        let direction = match query.direction {
            TraversalDirection::Forward => Direction::Outgoing,
            TraversalDirection::Backward => Direction::Incoming,
        };

        let mut visited = FxHashSet::default();
        let mut queue = std::collections::VecDeque::new();
        visited.insert(start_idx);
        queue.push_back((start_idx, 0u32, vec![graph.graph[start_idx].id.clone()]));

        let mut reaches = Vec::new();
        while let Some((idx, depth, path)) = queue.pop_front() {
            let node = &graph.graph[idx];
            let accesses = graph.data_access(&node.id);

            if let Some(reach) = Self::emit(node, accesses, depth, &path, query) {
                reaches.push(reach);
            }

            if depth >= query.max_depth {
                continue;
            }
            if let Some(stop) = &query.stop {
                if stop(node) && idx != start_idx {
                    continue;
                }
            }
            for next in graph.graph.neighbors_directed(idx, direction) {
                if visited.insert(next) {
                    let mut next_path = path.clone();
                    next_path.push(graph.graph[next].id.clone());
                    queue.push_back((next, depth + 1, next_path));
                }
            }
        }
        reaches
    }

    fn emit(
        node: &FunctionNode,
        accesses: &[DataAccess],
        depth: u32,
        path: &[String],
        query: &ReachabilityQuery,
    ) -> Option<Reach> {
        // Data-access expansion: a node with an overlay emits with its most
        // sensitive access attached.
        let access = accesses
            .iter()
            .max_by_key(|a| a.sensitivity.is_sensitive())
            .cloned();
        if query.sensitive_only {
            let sensitive = access
                .as_ref()
                .map(|a| a.sensitivity.is_sensitive())
                .unwrap_or(false)
                || node.accesses_sensitive_data;
            if !sensitive {
                return None;
            }
        }
        Some(Reach {
            path: path.to_vec(),
            access,
            depth,
        })
    }

    /// Batch traversal for a set of start functions, deduplicated by
    /// reached-node id keeping the shallowest reach.
    pub fn traverse_many(
        graph: &CallGraph,
        starts: &[String],
        query: &ReachabilityQuery,
    ) -> Vec<Reach> {
        let mut best: rustc_hash::FxHashMap<String, Reach> = rustc_hash::FxHashMap::default();
        for start in starts {
            for reach in Self::traverse(graph, start, query) {
                let key = reach.path.last().cloned().unwrap_or_default();
                match best.get(&key) {
                    Some(existing) if existing.depth <= reach.depth => {}
                    _ => {
                        best.insert(key, reach);
                    }
                }
            }
        }
        let mut reaches: Vec<Reach> = best.into_values().collect();
        reaches.sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.path.cmp(&b.path)));
        reaches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call_graph::{CallGraphBuilder, ShardCall, ShardFile, ShardFunction};
    use drift_core::types::Sensitivity;

    fn chain_graph() -> std::sync::Arc<CallGraph> {
        // a -> b -> c -> d, with c reading a sensitive table.
        let mut builder = CallGraphBuilder::new();
        builder.add_shard(ShardFile {
            file: "m.ts".to_string(),
            functions: ["a", "b", "c", "d"]
                .iter()
                .enumerate()
                .map(|(i, name)| ShardFunction {
                    id: None,
                    name: name.to_string(),
                    line: (i as u32 + 1) * 10,
                    kind: Default::default(),
                    is_entry_point: *name == "a",
                    accesses_sensitive_data: false,
                    entry_point: None,
                    data_access: if *name == "c" {
                        vec![crate::call_graph::DataAccess {
                            table: "users".to_string(),
                            fields: vec!["password".to_string()],
                            operation: crate::call_graph::DataOperation::Read,
                            sensitivity: Sensitivity::Credentials,
                        }]
                    } else {
                        Vec::new()
                    },
                })
                .collect(),
            calls: vec![
                ShardCall { caller: "a".into(), callee: "b".into(), line: 11 },
                ShardCall { caller: "b".into(), callee: "c".into(), line: 21 },
                ShardCall { caller: "c".into(), callee: "d".into(), line: 31 },
            ],
        });
        builder.build()
    }

    #[test]
    fn forward_respects_depth_cap() {
        let graph = chain_graph();
        let reaches = ReachabilityEngine::traverse(
            &graph,
            "m.ts:a",
            &ReachabilityQuery::forward().with_max_depth(2),
        );
        // a (0), b (1), c (2) — d is at depth 3, beyond the cap.
        assert_eq!(reaches.len(), 3);
        assert!(reaches.iter().all(|r| r.depth <= 2));
    }

    #[test]
    fn depth_zero_returns_only_source() {
        let graph = chain_graph();
        let reaches = ReachabilityEngine::traverse(
            &graph,
            "m.ts:a",
            &ReachabilityQuery::forward().with_max_depth(0),
        );
        assert_eq!(reaches.len(), 1);
        assert_eq!(reaches[0].path, vec!["m.ts:a".to_string()]);
    }

    #[test]
    fn backward_reaches_entry() {
        let graph = chain_graph();
        let reaches =
            ReachabilityEngine::traverse(&graph, "m.ts:d", &ReachabilityQuery::backward());
        assert_eq!(reaches.len(), 4);
        let deepest = reaches.iter().max_by_key(|r| r.depth).unwrap();
        assert_eq!(deepest.path.last().unwrap(), "m.ts:a");
    }

    #[test]
    fn sensitive_only_filters_and_carries_access() {
        let graph = chain_graph();
        let reaches = ReachabilityEngine::traverse(
            &graph,
            "m.ts:a",
            &ReachabilityQuery::forward().sensitive_only(),
        );
        assert_eq!(reaches.len(), 1);
        let reach = &reaches[0];
        assert_eq!(reach.path, vec!["m.ts:a", "m.ts:b", "m.ts:c"]);
        assert_eq!(reach.access.as_ref().unwrap().table, "users");
        assert_eq!(reach.depth, 2);
    }

    #[test]
    fn cycles_keep_shortest_path() {
        let mut builder = CallGraphBuilder::new();
        builder.add_shard(ShardFile {
            file: "c.ts".to_string(),
            functions: ["x", "y"]
                .iter()
                .map(|n| ShardFunction {
                    id: None,
                    name: n.to_string(),
                    line: 1,
                    kind: Default::default(),
                    is_entry_point: false,
                    accesses_sensitive_data: false,
                    entry_point: None,
                    data_access: Vec::new(),
                })
                .collect(),
            calls: vec![
                ShardCall { caller: "x".into(), callee: "y".into(), line: 2 },
                ShardCall { caller: "y".into(), callee: "x".into(), line: 3 },
            ],
        });
        let graph = builder.build();
        let reaches =
            ReachabilityEngine::traverse(&graph, "c.ts:x", &ReachabilityQuery::forward());
        // x at depth 0, y at depth 1 — the cycle does not re-emit x.
        assert_eq!(reaches.len(), 2);
    }
}
