//! Gate: constraint verification — proportion of architectural rules satisfied.

use serde::Deserialize;

use drift_core::types::{Violation, ViolationSeverity};

use super::types::{ConfigValidation, GateInput, GateResult, QualityGate};

const ID: &str = "constraint-verification";
const NAME: &str = "Constraint Verification";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Config {
    /// Satisfied proportion below this fails the gate.
    min_pass_rate: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self { min_pass_rate: 0.9 }
    }
}

pub struct ConstraintVerificationGate;

impl QualityGate for ConstraintVerificationGate {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Checks the proportion of architectural constraints currently satisfied"
    }

    fn execute(&self, input: &GateInput, config: &serde_json::Value) -> GateResult {
        let config: Config = if config.is_null() {
            Config::default()
        } else {
            serde_json::from_value(config.clone()).unwrap_or_default()
        };

        if input.constraints.is_empty() {
            return GateResult::pass(ID, NAME, 100.0, "No constraints defined");
        }

        let satisfied = input.constraints.iter().filter(|c| c.satisfied).count();
        let rate = satisfied as f64 / input.constraints.len() as f64;
        let score = rate * 100.0;

        let violations: Vec<Violation> = input
            .constraints
            .iter()
            .filter(|c| !c.satisfied)
            .map(|c| {
                let mut v = Violation::new(
                    format!("constraint:{}", c.id),
                    c.file.clone().unwrap_or_default(),
                    c.line.unwrap_or(1),
                    c.id.clone(),
                    ViolationSeverity::Error,
                );
                v.category = "constraint".to_string();
                v.expected = c.description.clone();
                v.actual = "constraint violated".to_string();
                v
            })
            .collect();

        let summary = format!(
            "{satisfied}/{} constraints satisfied ({:.1}%)",
            input.constraints.len(),
            rate * 100.0
        );

        if rate < config.min_pass_rate {
            GateResult::fail(ID, NAME, score, summary, violations)
        } else if !violations.is_empty() {
            let warnings = violations.iter().map(|v| v.expected.clone()).collect();
            let mut result = GateResult::warn(ID, NAME, score, summary, warnings);
            result.violations = violations;
            result
        } else {
            GateResult::pass(ID, NAME, score, summary)
        }
    }

    fn validate_config(&self, config: &serde_json::Value) -> ConfigValidation {
        if config.is_null() {
            return ConfigValidation::ok();
        }
        match serde_json::from_value::<Config>(config.clone()) {
            Ok(c) if (0.0..=1.0).contains(&c.min_pass_rate) => ConfigValidation::ok(),
            Ok(_) => ConfigValidation::fail(vec!["minPassRate must be in [0, 1]".to_string()]),
            Err(e) => ConfigValidation::fail(vec![e.to_string()]),
        }
    }

    fn default_config(&self) -> serde_json::Value {
        serde_json::json!({ "minPassRate": 0.9 })
    }
}
