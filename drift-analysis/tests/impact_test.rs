//! Impact scorer integration tests: monotonicity and the no-graph fallback.

use std::sync::Arc;

use drift_analysis::call_graph::{CallGraph, CallGraphBuilder, ShardCall, ShardFile, ShardFunction};
use drift_analysis::scorers::ImpactScorer;

fn function(name: &str, line: u32, entry: bool) -> ShardFunction {
    ShardFunction {
        id: None,
        name: name.to_string(),
        line,
        kind: Default::default(),
        is_entry_point: entry,
        accesses_sensitive_data: false,
        entry_point: None,
        data_access: Vec::new(),
    }
}

fn call(caller: &str, callee: &str, line: u32) -> ShardCall {
    ShardCall {
        caller: caller.to_string(),
        callee: callee.to_string(),
        line,
    }
}

/// Three files: api.ts (entry) -> svc.ts -> db.ts.
fn layered_graph() -> Arc<CallGraph> {
    let mut builder = CallGraphBuilder::new();
    builder.add_shard(ShardFile {
        file: "api.ts".to_string(),
        functions: vec![function("handler", 1, true)],
        calls: vec![call("handler", "service", 2)],
    });
    builder.add_shard(ShardFile {
        file: "svc.ts".to_string(),
        functions: vec![function("service", 1, false)],
        calls: vec![call("service", "query", 2)],
    });
    builder.add_shard(ShardFile {
        file: "db.ts".to_string(),
        functions: vec![function("query", 1, false)],
        calls: vec![],
    });
    builder.build()
}

/// Adding a changed file never lowers the risk score.
#[test]
fn risk_is_monotone_in_changed_files() {
    let graph = layered_graph();
    let scorer = ImpactScorer::default();

    let one = scorer.score(&graph, &["db.ts".to_string()]);
    let two = scorer.score(&graph, &["db.ts".to_string(), "svc.ts".to_string()]);
    let three = scorer.score(
        &graph,
        &["db.ts".to_string(), "svc.ts".to_string(), "api.ts".to_string()],
    );

    assert!(two.risk_score >= one.risk_score);
    assert!(three.risk_score >= two.risk_score);
}

/// Changing a leaf that an entry point depends on reports the entry point.
#[test]
fn entry_points_attributed() {
    let graph = layered_graph();
    let scorer = ImpactScorer::default();
    let metrics = scorer.score(&graph, &["db.ts".to_string()]);

    assert_eq!(metrics.entry_points_affected, 1);
    assert_eq!(metrics.affected_entry_points[0].name, "handler");
    assert_eq!(metrics.max_depth, 2);
    assert!(metrics.files_affected >= 3);
}

/// Without a call graph, the scorer estimates from path heuristics and
/// flags the result.
#[test]
fn fallback_estimation_is_flagged() {
    let scorer = ImpactScorer::default();
    let metrics = scorer.estimate_without_graph(&[
        "src/auth/login.ts".to_string(),
        "src/api/users.ts".to_string(),
    ]);

    assert!(metrics.summary.estimated);
    assert!(metrics.risk_score > 0.0);
    assert!(metrics
        .summary
        .notes
        .iter()
        .any(|n| n.contains("security-related")));
    assert!(metrics.summary.notes.iter().any(|n| n.contains("API")));
}

/// Unknown files against a real graph degrade to the estimator.
#[test]
fn unknown_files_use_estimator() {
    let graph = layered_graph();
    let scorer = ImpactScorer::default();
    let metrics = scorer.score(&graph, &["not/in/graph.ts".to_string()]);
    assert!(metrics.summary.estimated);
}

/// The empty change set scores zero risk.
#[test]
fn empty_change_set_is_risk_free() {
    let graph = layered_graph();
    let metrics = ImpactScorer::default().score(&graph, &[]);
    assert_eq!(metrics.risk_score, 0.0);
    assert_eq!(metrics.functions_affected, 0);
}
