//! Gate: impact simulation — blast radius of the changed files.

use serde::Deserialize;

use super::types::{ConfigValidation, GateInput, GateResult, QualityGate};
use crate::scorers::ImpactScorer;

const ID: &str = "impact-simulation";
const NAME: &str = "Impact Simulation";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Config {
    /// Risk score at or above this fails the gate.
    fail_above: f64,
    /// Risk score at or above this warns.
    warn_above: f64,
    max_depth: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fail_above: 75.0,
            warn_above: 50.0,
            max_depth: 10,
        }
    }
}

pub struct ImpactSimulationGate;

impl QualityGate for ImpactSimulationGate {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Scores the blast radius of the changed files via backward reachability"
    }

    fn execute(&self, input: &GateInput, config: &serde_json::Value) -> GateResult {
        let config: Config = if config.is_null() {
            Config::default()
        } else {
            serde_json::from_value(config.clone()).unwrap_or_default()
        };

        if input.changed_files.is_empty() {
            return GateResult::pass(ID, NAME, 100.0, "No changed files");
        }

        let scorer = ImpactScorer::new(config.max_depth);
        let metrics = match &input.graph {
            Some(graph) => scorer.score(graph, &input.changed_files),
            None => scorer.estimate_without_graph(&input.changed_files),
        };

        let score = (100.0 - metrics.risk_score).clamp(0.0, 100.0);
        let summary = format!(
            "risk {:.0}/100 ({}) — {} function(s), {} entry point(s), depth {}",
            metrics.risk_score,
            metrics.risk_level,
            metrics.functions_affected,
            metrics.entry_points_affected,
            metrics.max_depth
        );
        let details = serde_json::to_value(&metrics).unwrap_or(serde_json::Value::Null);

        if metrics.risk_score >= config.fail_above {
            GateResult::fail(ID, NAME, score, summary, Vec::new()).with_details(details)
        } else if metrics.risk_score >= config.warn_above || metrics.summary.estimated {
            let mut warnings = metrics.breaking_change_risks.clone();
            if metrics.summary.estimated {
                warnings.push("impact estimated without a call graph".to_string());
            }
            GateResult::warn(ID, NAME, score, summary, warnings).with_details(details)
        } else {
            GateResult::pass(ID, NAME, score, summary).with_details(details)
        }
    }

    fn validate_config(&self, config: &serde_json::Value) -> ConfigValidation {
        if config.is_null() {
            return ConfigValidation::ok();
        }
        match serde_json::from_value::<Config>(config.clone()) {
            Ok(c) if c.warn_above <= c.fail_above => ConfigValidation::ok(),
            Ok(_) => ConfigValidation::fail(vec!["warnAbove must not exceed failAbove".to_string()]),
            Err(e) => ConfigValidation::fail(vec![e.to_string()]),
        }
    }

    fn default_config(&self) -> serde_json::Value {
        serde_json::json!({ "failAbove": 75.0, "warnAbove": 50.0, "maxDepth": 10 })
    }
}
