//! Quality gate integration tests: regression thresholds, security
//! boundaries, aggregation modes, and deterministic ordering.

use std::sync::Arc;

use drift_analysis::call_graph::{
    CallGraph, CallGraphBuilder, DataAccess, DataOperation, FunctionKind, ShardCall, ShardFile,
    ShardFunction,
};
use drift_analysis::gates::{
    GateInput, GateOrchestrator, GateStatus, QualityGate, RegressionDetectionGate,
    SecurityBoundaryGate,
};
use drift_core::cancel::{Budget, CancellationToken};
use drift_core::config::{AggregationMode, GatesConfig};
use drift_core::types::{
    DetectionMethod, HealthSnapshot, Pattern, PatternHealth, Sensitivity,
};

fn pattern(id: &str, category: &str, confidence: f64) -> Pattern {
    Pattern::discovered(id, category, id, "structural/shape", DetectionMethod::Structural, confidence)
}

fn baseline(entries: &[(&str, &str, f64, usize, usize)]) -> HealthSnapshot {
    HealthSnapshot {
        commit_sha: None,
        branch: "main".to_string(),
        timestamp: chrono::Utc::now(),
        patterns: entries
            .iter()
            .map(|(id, category, confidence, locations, outliers)| PatternHealth {
                pattern_id: id.to_string(),
                category: category.to_string(),
                confidence: *confidence,
                locations: *locations,
                outliers: *outliers,
            })
            .collect(),
    }
}

/// Regression gate: a 30-point confidence drop against a 10-point threshold
/// is severe (2x = 20 < 30), fails the gate, and caps the score at 80.
#[test]
fn regression_gate_severe_trigger() {
    let gate = RegressionDetectionGate;
    let mut input = GateInput::default();
    input.baseline = Some(baseline(&[("p1", "structural", 0.9, 10, 0)]));
    let mut current = pattern("p1", "structural", 0.6);
    current.locations = (0..10)
        .map(|i| drift_core::types::Location::new("src/a.ts", i + 1))
        .collect();
    input.patterns = vec![current];

    let result = gate.execute(&input, &serde_json::Value::Null);
    assert_eq!(result.status, GateStatus::Failed);
    assert!(!result.passed);
    assert!(result.score <= 80.0, "score was {}", result.score);
    assert!(result.summary.contains("severe regression"), "summary: {}", result.summary);
    assert_eq!(result.violations.len(), 1);
}

/// Empty baseline: regression gate passes with "no baseline".
#[test]
fn regression_gate_empty_baseline() {
    let gate = RegressionDetectionGate;
    let input = GateInput {
        patterns: vec![pattern("p1", "structural", 0.9)],
        ..Default::default()
    };
    let result = gate.execute(&input, &serde_json::Value::Null);
    assert_eq!(result.status, GateStatus::Passed);
    assert!(result.passed);
    assert_eq!(result.summary, "no baseline");
}

/// A regression in a critical category fails the gate even when minor.
#[test]
fn regression_gate_critical_category() {
    let gate = RegressionDetectionGate;
    let mut input = GateInput::default();
    input.baseline = Some(baseline(&[("sec1", "security", 0.9, 5, 0)]));
    let mut current = pattern("sec1", "security", 0.85); // 5-point drop: minor
    current.locations = (0..5)
        .map(|i| drift_core::types::Location::new("src/s.ts", i + 1))
        .collect();
    input.patterns = vec![current];

    let result = gate.execute(&input, &serde_json::Value::Null);
    assert_eq!(result.status, GateStatus::Failed);
}

fn unauthorized_graph() -> Arc<CallGraph> {
    // HTTP handler h -> service s -> repo r; r reads `users`; no auth names.
    let mut builder = CallGraphBuilder::new();
    builder.add_shard(ShardFile {
        file: "src/service.ts".to_string(),
        functions: vec![
            ShardFunction {
                id: Some("h".to_string()),
                name: "h".to_string(),
                line: 1,
                kind: FunctionKind::Handler,
                is_entry_point: true,
                accesses_sensitive_data: false,
                entry_point: None,
                data_access: vec![],
            },
            ShardFunction {
                id: Some("s".to_string()),
                name: "s".to_string(),
                line: 10,
                kind: FunctionKind::Function,
                is_entry_point: false,
                accesses_sensitive_data: false,
                entry_point: None,
                data_access: vec![],
            },
            ShardFunction {
                id: Some("r".to_string()),
                name: "r".to_string(),
                line: 20,
                kind: FunctionKind::Function,
                is_entry_point: false,
                accesses_sensitive_data: false,
                entry_point: None,
                data_access: vec![DataAccess {
                    table: "users".to_string(),
                    fields: vec!["email".to_string()],
                    operation: DataOperation::Read,
                    sensitivity: Sensitivity::Pii,
                }],
            },
        ],
        calls: vec![
            ShardCall { caller: "h".to_string(), callee: "s".to_string(), line: 2 },
            ShardCall { caller: "s".to_string(), callee: "r".to_string(), line: 11 },
        ],
    });
    builder.build()
}

/// Security boundary: h -> s -> r with r reading `users` and no auth
/// function anywhere produces one unauthorized path with zero coverage.
#[test]
fn security_boundary_unauthorized_path() {
    let gate = SecurityBoundaryGate;
    let input = GateInput {
        changed_files: vec!["src/service.ts".to_string()],
        graph: Some(unauthorized_graph()),
        ..Default::default()
    };

    let result = gate.execute(&input, &serde_json::Value::Null);
    assert_eq!(result.status, GateStatus::Failed);
    assert!(!result.passed);

    let paths = result.details["unauthorizedPaths"].as_array().unwrap();
    assert_eq!(paths.len(), 1);
    let path: Vec<&str> = paths[0]["path"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(path, vec!["h", "s", "r"]);
    assert_eq!(paths[0]["sensitiveData"], "users");
    assert_eq!(result.details["authCoverage"], 0.0);
}

/// Adding an auth function on the route authorizes the path.
#[test]
fn security_boundary_auth_on_path_passes() {
    let mut builder = CallGraphBuilder::new();
    builder.add_shard(ShardFile {
        file: "src/service.ts".to_string(),
        functions: vec![
            ShardFunction {
                id: Some("h".to_string()),
                name: "h".to_string(),
                line: 1,
                kind: FunctionKind::Handler,
                is_entry_point: true,
                accesses_sensitive_data: false,
                entry_point: None,
                data_access: vec![],
            },
            ShardFunction {
                id: Some("requireAuth".to_string()),
                name: "requireAuth".to_string(),
                line: 5,
                kind: FunctionKind::Function,
                is_entry_point: false,
                accesses_sensitive_data: false,
                entry_point: None,
                data_access: vec![],
            },
            ShardFunction {
                id: Some("r".to_string()),
                name: "r".to_string(),
                line: 20,
                kind: FunctionKind::Function,
                is_entry_point: false,
                accesses_sensitive_data: false,
                entry_point: None,
                data_access: vec![DataAccess {
                    table: "users".to_string(),
                    fields: vec![],
                    operation: DataOperation::Read,
                    sensitivity: Sensitivity::Pii,
                }],
            },
        ],
        calls: vec![
            ShardCall { caller: "h".to_string(), callee: "requireAuth".to_string(), line: 2 },
            ShardCall { caller: "requireAuth".to_string(), callee: "r".to_string(), line: 6 },
        ],
    });
    let graph = builder.build();

    let gate = SecurityBoundaryGate;
    let input = GateInput {
        changed_files: vec!["src/service.ts".to_string()],
        graph: Some(graph),
        ..Default::default()
    };
    let result = gate.execute(&input, &serde_json::Value::Null);
    assert_eq!(result.status, GateStatus::Passed);
    assert_eq!(result.details["authCoverage"], 100.0);
}

/// Orchestrator: all-pass aggregation, deterministic gate order, and
/// violations sorted by (file, line, patternId).
#[test]
fn orchestrator_deterministic_and_ordered() {
    let orchestrator = GateOrchestrator::new();
    let config = GatesConfig::default();
    let input = GateInput {
        changed_files: vec!["src/service.ts".to_string()],
        graph: Some(unauthorized_graph()),
        ..Default::default()
    };
    let cancel = CancellationToken::new();

    let a = orchestrator.run(&config, &input, &cancel, &Budget::default());
    let b = orchestrator.run(&config, &input, &cancel, &Budget::default());

    // Identical inputs produce identical verdicts and ordering.
    let ids_a: Vec<&str> = a.gates.iter().map(|g| g.gate_id.as_str()).collect();
    let ids_b: Vec<&str> = b.gates.iter().map(|g| g.gate_id.as_str()).collect();
    assert_eq!(ids_a, ids_b);
    let mut sorted = ids_a.clone();
    sorted.sort_unstable();
    assert_eq!(ids_a, sorted, "gates must run in id order");

    assert_eq!(a.status, GateStatus::Failed); // security boundary fails
    assert!(!a.passed);

    let keys: Vec<_> = a
        .violations
        .iter()
        .map(|v| (v.file.clone(), v.line, v.pattern_id.clone()))
        .collect();
    let mut sorted_keys = keys.clone();
    sorted_keys.sort();
    assert_eq!(keys, sorted_keys);
}

/// Invalid per-gate config skips the gate (listed in metadata), never fails it.
#[test]
fn invalid_gate_config_skips() {
    let orchestrator = GateOrchestrator::new();
    let mut config = GatesConfig::default();
    config.gate_config.insert(
        "pattern-compliance".to_string(),
        serde_json::json!({ "minCompliance": 7.5 }),
    );
    let input = GateInput::default();
    let result = orchestrator.run(&config, &input, &CancellationToken::new(), &Budget::default());

    assert!(result
        .metadata
        .gates_skipped
        .contains(&"pattern-compliance".to_string()));
    assert!(!result
        .metadata
        .gates_run
        .contains(&"pattern-compliance".to_string()));
    assert!(result.warnings.iter().any(|w| w.contains("invalid config")));
    assert!(result.passed);
}

/// AnyPass aggregation passes when at least one gate passes.
#[test]
fn any_pass_aggregation() {
    let orchestrator = GateOrchestrator::new();
    let mut config = GatesConfig::default();
    config.aggregation = AggregationMode::AnyPass;
    let input = GateInput {
        changed_files: vec!["src/service.ts".to_string()],
        graph: Some(unauthorized_graph()),
        ..Default::default()
    };
    let result = orchestrator.run(&config, &input, &CancellationToken::new(), &Budget::default());
    assert!(result.passed);
    assert_eq!(result.status, GateStatus::Warned);
}

/// Weighted aggregation respects the pass threshold.
#[test]
fn weighted_aggregation_threshold() {
    let orchestrator = GateOrchestrator::new();
    let mut config = GatesConfig::default();
    config.aggregation = AggregationMode::Weighted;
    config.pass_threshold = 99.9;
    let input = GateInput {
        changed_files: vec!["src/service.ts".to_string()],
        graph: Some(unauthorized_graph()),
        ..Default::default()
    };
    let result = orchestrator.run(&config, &input, &CancellationToken::new(), &Budget::default());
    // Security boundary scores 0 here, dragging the weighted mean under 99.9.
    assert!(!result.passed);
    assert_eq!(result.status, GateStatus::Failed);
}

/// An exhausted budget downgrades failures to warned with a timeout warning.
#[test]
fn exhausted_budget_warns_not_fails() {
    let orchestrator = GateOrchestrator::new();
    let config = GatesConfig::default();
    let input = GateInput {
        changed_files: vec!["src/service.ts".to_string()],
        graph: Some(unauthorized_graph()),
        ..Default::default()
    };
    let result = orchestrator.run(
        &config,
        &input,
        &CancellationToken::new(),
        &Budget::from_millis(0),
    );
    assert!(result.gates.iter().all(|g| g.status != GateStatus::Failed));
    assert!(result.warnings.iter().any(|w| w == "timeout"));
}
