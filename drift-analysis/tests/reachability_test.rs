//! Reachability property tests: the depth cap bounds every emitted reach on
//! arbitrary graphs, and path lengths agree with reported depths.

use drift_analysis::call_graph::{CallGraphBuilder, ShardCall, ShardFile, ShardFunction};
use drift_analysis::reachability::{ReachabilityEngine, ReachabilityQuery};
use proptest::prelude::*;

/// Build a graph of `n` functions with edges from an adjacency list.
fn build(n: usize, edges: &[(usize, usize)]) -> std::sync::Arc<drift_analysis::CallGraph> {
    let mut builder = CallGraphBuilder::new();
    builder.add_shard(ShardFile {
        file: "g.ts".to_string(),
        functions: (0..n)
            .map(|i| ShardFunction {
                id: Some(format!("f{i}")),
                name: format!("f{i}"),
                line: i as u32 + 1,
                kind: Default::default(),
                is_entry_point: false,
                accesses_sensitive_data: false,
                entry_point: None,
                data_access: Vec::new(),
            })
            .collect(),
        calls: edges
            .iter()
            .map(|(a, b)| ShardCall {
                caller: format!("f{a}"),
                callee: format!("f{b}"),
                line: 1,
            })
            .collect(),
    });
    builder.build()
}

proptest! {
    /// Every reach at max_depth d has depth <= d and a path of depth + 1 nodes.
    #[test]
    fn depth_cap_holds_on_arbitrary_graphs(
        n in 2usize..12,
        edges in proptest::collection::vec((0usize..12, 0usize..12), 0..40),
        max_depth in 0u32..6,
    ) {
        let edges: Vec<(usize, usize)> =
            edges.into_iter().map(|(a, b)| (a % n, b % n)).collect();
        let graph = build(n, &edges);
        let query = ReachabilityQuery::forward().with_max_depth(max_depth);
        for reach in ReachabilityEngine::traverse(&graph, "f0", &query) {
            prop_assert!(reach.depth <= max_depth);
            prop_assert_eq!(reach.path.len() as u32, reach.depth + 1);
            prop_assert_eq!(reach.path.first().map(String::as_str), Some("f0"));
        }
    }

    /// BFS visits each node once: emitted targets are unique.
    #[test]
    fn targets_are_unique(
        n in 2usize..12,
        edges in proptest::collection::vec((0usize..12, 0usize..12), 0..40),
    ) {
        let edges: Vec<(usize, usize)> =
            edges.into_iter().map(|(a, b)| (a % n, b % n)).collect();
        let graph = build(n, &edges);
        let reaches =
            ReachabilityEngine::traverse(&graph, "f0", &ReachabilityQuery::forward());
        let mut targets: Vec<&String> =
            reaches.iter().filter_map(|r| r.path.last()).collect();
        let before = targets.len();
        targets.sort();
        targets.dedup();
        prop_assert_eq!(before, targets.len());
    }
}
