//! Gate: security boundary — unauthorized reachability from changed
//! functions to protected tables.
//!
//! For every changed function that can reach a protected table, the gate
//! scans its incoming caller paths for an auth function. A sensitive access
//! with no auth anywhere on the route is an unauthorized path.

use serde::{Deserialize, Serialize};

use drift_core::types::{Violation, ViolationSeverity};

use super::types::{ConfigValidation, GateInput, GateResult, QualityGate};
use crate::call_graph::CallGraph;
use crate::reachability::{Reach, ReachabilityEngine, ReachabilityQuery};
use crate::scorers::security::classify_sensitivity;

const ID: &str = "security-boundary";
const NAME: &str = "Security Boundary";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Config {
    required_auth_patterns: Vec<String>,
    max_data_flow_depth: u32,
    /// Explicitly protected tables. Tables with a sensitive lexical
    /// classification are protected even when not listed.
    protected_tables: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            required_auth_patterns: vec![
                "requireAuth".to_string(),
                "authenticate".to_string(),
                "authorize".to_string(),
                "checkPermission".to_string(),
                "verifyToken".to_string(),
            ],
            max_data_flow_depth: 10,
            protected_tables: Vec::new(),
        }
    }
}

/// Per-table protection outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum TableProtection {
    Protected,
    Unprotected,
    Partial,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct UnauthorizedPath {
    path: Vec<String>,
    sensitive_data: String,
}

pub struct SecurityBoundaryGate;

impl SecurityBoundaryGate {
    fn is_protected(config: &Config, table: &str, sensitivity_hint: bool) -> bool {
        config.protected_tables.iter().any(|t| t == table)
            || sensitivity_hint
            || classify_sensitivity(table).is_sensitive()
    }

    fn is_auth_name(config: &Config, name: &str) -> bool {
        let lower = name.to_ascii_lowercase();
        config
            .required_auth_patterns
            .iter()
            .any(|p| lower.contains(&p.to_ascii_lowercase()))
    }

    /// Incoming caller paths for a function: entry-rooted paths when any
    /// exist, otherwise every maximal caller chain.
    fn incoming_paths(graph: &CallGraph, function: &str, depth: u32) -> Vec<Vec<String>> {
        let reaches = ReachabilityEngine::traverse(
            graph,
            function,
            &ReachabilityQuery::backward().with_max_depth(depth),
        );
        let entry_rooted: Vec<&Reach> = reaches
            .iter()
            .filter(|r| {
                r.path
                    .last()
                    .and_then(|id| graph.function(id))
                    .is_some_and(|n| n.is_entry_point)
            })
            .collect();
        if !entry_rooted.is_empty() {
            return entry_rooted.iter().map(|r| r.path.clone()).collect();
        }
        // No entry points above: the deepest chains stand in.
        let max_depth = reaches.iter().map(|r| r.depth).max().unwrap_or(0);
        reaches
            .iter()
            .filter(|r| r.depth == max_depth)
            .map(|r| r.path.clone())
            .collect()
    }
}

impl QualityGate for SecurityBoundaryGate {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Requires an auth function on every path from entry points to protected tables"
    }

    fn execute(&self, input: &GateInput, config: &serde_json::Value) -> GateResult {
        let config: Config = if config.is_null() {
            Config::default()
        } else {
            serde_json::from_value(config.clone()).unwrap_or_default()
        };

        let Some(graph) = &input.graph else {
            return GateResult::warn(
                ID,
                NAME,
                100.0,
                "No call graph available",
                vec!["security boundaries not verified: no call graph".to_string()],
            );
        };

        let changed_functions: Vec<String> = input
            .changed_files
            .iter()
            .flat_map(|f| graph.functions_in_file(f))
            .map(|n| n.id.clone())
            .collect();

        if changed_functions.is_empty() {
            return GateResult::pass(ID, NAME, 100.0, "No changed functions in the call graph");
        }

        let forward = ReachabilityQuery::forward().with_max_depth(config.max_data_flow_depth);
        let mut unauthorized: Vec<UnauthorizedPath> = Vec::new();
        let mut table_paths: rustc_hash::FxHashMap<String, (usize, usize)> =
            rustc_hash::FxHashMap::default();
        let mut total_paths = 0usize;
        let mut authorized_paths = 0usize;

        for function in &changed_functions {
            for reach in ReachabilityEngine::traverse(graph, function, &forward) {
                let Some(access) = &reach.access else { continue };
                if !Self::is_protected(&config, &access.table, access.sensitivity.is_sensitive()) {
                    continue;
                }
                let forward_names: Vec<String> = reach
                    .path
                    .iter()
                    .filter_map(|id| graph.function(id))
                    .map(|n| n.name.clone())
                    .collect();

                for incoming in Self::incoming_paths(graph, function, config.max_data_flow_depth) {
                    let incoming_names: Vec<String> = incoming
                        .iter()
                        .filter_map(|id| graph.function(id))
                        .map(|n| n.name.clone())
                        .collect();

                    // Entry-rooted route: reversed caller chain, then the data path.
                    let mut route: Vec<String> =
                        incoming_names.iter().rev().cloned().collect();
                    route.extend(forward_names.iter().skip(1).cloned());

                    let has_auth = route.iter().any(|n| Self::is_auth_name(&config, n));
                    total_paths += 1;
                    let entry = table_paths.entry(access.table.clone()).or_insert((0, 0));
                    entry.1 += 1;
                    if has_auth {
                        authorized_paths += 1;
                        entry.0 += 1;
                    } else {
                        unauthorized.push(UnauthorizedPath {
                            path: route,
                            sensitive_data: access.table.clone(),
                        });
                    }
                }
            }
        }

        unauthorized.sort_by(|a, b| a.path.cmp(&b.path));
        unauthorized.dedup_by(|a, b| a.path == b.path && a.sensitive_data == b.sensitive_data);

        let mut table_protection: Vec<(String, TableProtection)> = table_paths
            .iter()
            .map(|(table, (ok, total))| {
                let state = if ok == total {
                    TableProtection::Protected
                } else if *ok == 0 {
                    TableProtection::Unprotected
                } else {
                    TableProtection::Partial
                };
                (table.clone(), state)
            })
            .collect();
        table_protection.sort_by(|a, b| a.0.cmp(&b.0));

        let auth_coverage = if total_paths == 0 {
            100.0
        } else {
            authorized_paths as f64 / total_paths as f64 * 100.0
        };

        let violations: Vec<Violation> = unauthorized
            .iter()
            .map(|u| {
                let mut v = Violation::new(
                    format!("unauthorized-path:{}:{}", u.sensitive_data, u.path.join(">")),
                    u.path.first().cloned().unwrap_or_default(),
                    1,
                    ID,
                    ViolationSeverity::Error,
                );
                v.category = "security".to_string();
                v.expected = format!(
                    "an auth function ({}) on the path",
                    config.required_auth_patterns.join(", ")
                );
                v.actual = format!(
                    "unauthorized path {} touches '{}'",
                    u.path.join(" -> "),
                    u.sensitive_data
                );
                v
            })
            .collect();

        let details = serde_json::json!({
            "unauthorizedPaths": unauthorized,
            "tableProtection": table_protection
                .iter()
                .map(|(t, s)| serde_json::json!({ "table": t, "state": s }))
                .collect::<Vec<_>>(),
            "authCoverage": auth_coverage,
        });

        let summary = format!(
            "{} unauthorized path(s), auth coverage {:.0}%",
            unauthorized.len(),
            auth_coverage
        );

        if !unauthorized.is_empty() {
            GateResult::fail(ID, NAME, auth_coverage, summary, violations).with_details(details)
        } else {
            GateResult::pass(ID, NAME, 100.0, summary).with_details(details)
        }
    }

    fn validate_config(&self, config: &serde_json::Value) -> ConfigValidation {
        if config.is_null() {
            return ConfigValidation::ok();
        }
        match serde_json::from_value::<Config>(config.clone()) {
            Ok(c) if !c.required_auth_patterns.is_empty() => ConfigValidation::ok(),
            Ok(_) => ConfigValidation::fail(vec![
                "requiredAuthPatterns must not be empty".to_string()
            ]),
            Err(e) => ConfigValidation::fail(vec![e.to_string()]),
        }
    }

    fn default_config(&self) -> serde_json::Value {
        serde_json::json!({
            "requiredAuthPatterns": [
                "requireAuth", "authenticate", "authorize", "checkPermission", "verifyToken"
            ],
            "maxDataFlowDepth": 10,
            "protectedTables": [],
        })
    }
}
