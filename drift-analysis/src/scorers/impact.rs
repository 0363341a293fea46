//! Impact scoring — blast radius of a change set via backward reachability.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use drift_core::types::{RiskLevel, Sensitivity};

use crate::call_graph::{CallGraph, EntryPointKind, HttpRoute};
use crate::reachability::{ReachabilityEngine, ReachabilityQuery};

/// A reference to an affected entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPointRef {
    pub id: String,
    pub name: String,
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntryPointKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<HttpRoute>,
}

/// A path from a changed function to sensitive data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitiveDataPath {
    pub path: Vec<String>,
    pub table: String,
    pub sensitivity: Sensitivity,
}

/// Roll-up counts for the envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactSummary {
    pub changed_files: usize,
    pub estimated: bool,
    pub notes: Vec<String>,
}

/// Blast-radius metrics for a change set. `risk_score` is monotone
/// non-decreasing in the set of changed files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactMetrics {
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub files_affected: usize,
    pub functions_affected: usize,
    pub entry_points_affected: usize,
    pub max_depth: u32,
    pub breaking_changes: bool,
    pub breaking_change_risks: Vec<String>,
    pub affected_entry_points: Vec<EntryPointRef>,
    pub affected_data_paths: Vec<SensitiveDataPath>,
    pub summary: ImpactSummary,
}

impl ImpactMetrics {
    fn none(changed_files: usize) -> Self {
        Self {
            risk_score: 0.0,
            risk_level: RiskLevel::Low,
            files_affected: 0,
            functions_affected: 0,
            entry_points_affected: 0,
            max_depth: 0,
            breaking_changes: false,
            breaking_change_risks: Vec::new(),
            affected_entry_points: Vec::new(),
            affected_data_paths: Vec::new(),
            summary: ImpactSummary {
                changed_files,
                estimated: false,
                notes: Vec::new(),
            },
        }
    }
}

/// Scores change sets against a call-graph snapshot.
pub struct ImpactScorer {
    max_depth: u32,
}

impl ImpactScorer {
    pub fn new(max_depth: u32) -> Self {
        Self { max_depth }
    }

    /// Score a set of changed files.
    ///
    /// For each function in a changed file, backward reachability finds who
    /// depends on it; the union of reached entry points, the deepest caller
    /// chain, sensitive data on forward paths, and file fan-out combine into
    /// the risk score.
    pub fn score(&self, graph: &CallGraph, changed_files: &[String]) -> ImpactMetrics {
        let mut metrics = ImpactMetrics::none(changed_files.len());
        if changed_files.is_empty() {
            return metrics;
        }

        let changed_functions: Vec<String> = changed_files
            .iter()
            .flat_map(|f| graph.functions_in_file(f))
            .map(|n| n.id.clone())
            .collect();

        if changed_functions.is_empty() {
            return self.estimate_without_graph(changed_files);
        }

        let backward = ReachabilityQuery::backward().with_max_depth(self.max_depth);
        let mut files: FxHashSet<String> = changed_files.iter().cloned().collect();
        let mut functions: FxHashSet<String> = changed_functions.iter().cloned().collect();
        let mut entry_ids: FxHashSet<String> = FxHashSet::default();
        let mut max_depth = 0u32;

        // Per-start traversal keeps the union monotone in the change set:
        // adding a file only adds reaches, it never shortens existing ones.
        for start in &changed_functions {
            for reach in ReachabilityEngine::traverse(graph, start, &backward) {
                let Some(target) = reach.path.last() else {
                    continue;
                };
                if let Some(node) = graph.function(target) {
                    files.insert(node.file.clone());
                    functions.insert(node.id.clone());
                    if node.is_entry_point {
                        entry_ids.insert(node.id.clone());
                    }
                }
                max_depth = max_depth.max(reach.depth);
            }
        }

        // Sensitive data on the forward side of the changed functions.
        let forward = ReachabilityQuery::forward()
            .with_max_depth(self.max_depth)
            .sensitive_only();
        let mut data_paths = Vec::new();
        for start in &changed_functions {
            for reach in ReachabilityEngine::traverse(graph, start, &forward) {
                if let Some(access) = reach.access {
                    data_paths.push(SensitiveDataPath {
                        path: reach.path,
                        table: access.table,
                        sensitivity: access.sensitivity,
                    });
                }
            }
        }
        data_paths.sort_by(|a, b| a.path.cmp(&b.path));
        data_paths.dedup_by(|a, b| a.path == b.path && a.table == b.table);

        let mut affected_entry_points: Vec<EntryPointRef> = entry_ids
            .iter()
            .filter_map(|id| graph.function(id))
            .map(|n| EntryPointRef {
                id: n.id.clone(),
                name: n.name.clone(),
                file: n.file.clone(),
                kind: n.entry_point.as_ref().map(|e| e.kind),
                route: n.entry_point.as_ref().and_then(|e| e.route.clone()),
            })
            .collect();
        affected_entry_points.sort_by(|a, b| a.id.cmp(&b.id));

        let mut breaking_change_risks = Vec::new();
        for id in &changed_functions {
            let callers = graph.callers(id);
            if callers.len() > 5 {
                breaking_change_risks.push(format!(
                    "{id} has {} direct callers; signature changes break them all",
                    callers.len()
                ));
            }
            if graph.function(id).is_some_and(|n| n.is_entry_point) {
                breaking_change_risks.push(format!("{id} is a public entry point"));
            }
        }
        breaking_change_risks.sort();

        // Monotone combination: every term only grows as files are added.
        let risk_score = (entry_ids.len() as f64 * 8.0
            + data_paths.len() as f64 * 15.0
            + files.len() as f64 * 2.0
            + functions.len() as f64
            + max_depth as f64 * 3.0)
            .min(100.0);

        metrics.risk_score = risk_score;
        metrics.risk_level = RiskLevel::from_score(risk_score);
        metrics.files_affected = files.len();
        metrics.functions_affected = functions.len();
        metrics.entry_points_affected = entry_ids.len();
        metrics.max_depth = max_depth;
        metrics.breaking_changes = !breaking_change_risks.is_empty();
        metrics.breaking_change_risks = breaking_change_risks;
        metrics.affected_entry_points = affected_entry_points;
        metrics.affected_data_paths = data_paths;
        metrics
    }

    /// Path-heuristic estimation when no call graph is available.
    /// Lower-confidence result, flagged as estimated on the summary.
    pub fn estimate_without_graph(&self, changed_files: &[String]) -> ImpactMetrics {
        const SECURITY_HINTS: &[&str] =
            &["auth", "security", "password", "token", "crypto", "login", "session"];
        const API_HINTS: &[&str] = &["api/", "routes/", "controllers/", "handlers/", "endpoints/"];

        let mut score = changed_files.len() as f64 * 2.0;
        let mut notes = vec!["No call graph available; score estimated from file paths".to_string()];
        for file in changed_files {
            let lower = file.to_ascii_lowercase();
            if SECURITY_HINTS.iter().any(|h| lower.contains(h)) {
                score += 15.0;
                notes.push(format!("{file} looks security-related"));
            }
            if API_HINTS.iter().any(|h| lower.contains(h)) {
                score += 10.0;
                notes.push(format!("{file} looks like an API surface"));
            }
        }
        notes.sort();
        notes.dedup();

        let score = score.min(100.0);
        let mut metrics = ImpactMetrics::none(changed_files.len());
        metrics.risk_score = score;
        metrics.risk_level = RiskLevel::from_score(score);
        metrics.files_affected = changed_files.len();
        metrics.summary.estimated = true;
        metrics.summary.notes = notes;
        metrics
    }
}

impl Default for ImpactScorer {
    fn default() -> Self {
        Self::new(ReachabilityQuery::DEFAULT_MAX_DEPTH)
    }
}
