//! Gate: custom rules — user-defined predicates over files and patterns.

use serde::Deserialize;

use drift_core::types::{Violation, ViolationSeverity};

use super::types::{ConfigValidation, GateInput, GateResult, QualityGate};
use crate::detectors::structural_base::glob_match;

const ID: &str = "custom-rules";
const NAME: &str = "Custom Rules";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct Rule {
    id: String,
    description: String,
    /// Changed files matching any of these globs violate the rule.
    forbidden_paths: Vec<String>,
    /// The workspace must contain a file matching each of these globs.
    required_files: Vec<String>,
    /// Per-category violation budget over the current pattern set.
    max_outliers_per_category: Option<(String, usize)>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct Config {
    rules: Vec<Rule>,
}

pub struct CustomRulesGate;

impl QualityGate for CustomRulesGate {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Evaluates user-defined rules: forbidden paths, required files, outlier budgets"
    }

    fn execute(&self, input: &GateInput, config: &serde_json::Value) -> GateResult {
        let config: Config = if config.is_null() {
            Config::default()
        } else {
            serde_json::from_value(config.clone()).unwrap_or_default()
        };

        if config.rules.is_empty() {
            return GateResult::pass(ID, NAME, 100.0, "No custom rules configured");
        }

        let mut violations = Vec::new();
        for rule in &config.rules {
            for glob in &rule.forbidden_paths {
                for file in input.changed_files.iter().filter(|f| glob_match(glob, f)) {
                    let mut v = Violation::new(
                        format!("{}:{file}", rule.id),
                        file.clone(),
                        1,
                        rule.id.clone(),
                        ViolationSeverity::Error,
                    );
                    v.category = "custom".to_string();
                    v.expected = rule.description.clone();
                    v.actual = format!("changed file matches forbidden path '{glob}'");
                    violations.push(v);
                }
            }
            for glob in &rule.required_files {
                if !input.all_files.iter().any(|f| glob_match(glob, f)) {
                    let mut v = Violation::new(
                        format!("{}:missing:{glob}", rule.id),
                        String::new(),
                        1,
                        rule.id.clone(),
                        ViolationSeverity::Error,
                    );
                    v.category = "custom".to_string();
                    v.expected = format!("a file matching '{glob}'");
                    v.actual = "no such file in the workspace".to_string();
                    violations.push(v);
                }
            }
            if let Some((category, budget)) = &rule.max_outliers_per_category {
                let outliers: usize = input
                    .patterns
                    .iter()
                    .filter(|p| &p.category == category)
                    .map(|p| p.outliers.len())
                    .sum();
                if outliers > *budget {
                    let mut v = Violation::new(
                        format!("{}:budget:{category}", rule.id),
                        String::new(),
                        1,
                        rule.id.clone(),
                        ViolationSeverity::Warning,
                    );
                    v.category = category.clone();
                    v.expected = format!("at most {budget} outlier(s) in '{category}'");
                    v.actual = format!("{outliers} outlier(s)");
                    violations.push(v);
                }
            }
        }

        let score = if violations.is_empty() {
            100.0
        } else {
            (100.0 - violations.len() as f64 * 10.0).max(0.0)
        };
        let summary = format!(
            "{} violation(s) across {} rule(s)",
            violations.len(),
            config.rules.len()
        );

        if violations.iter().any(|v| v.severity == ViolationSeverity::Error) {
            GateResult::fail(ID, NAME, score, summary, violations)
        } else if !violations.is_empty() {
            let warnings = violations.iter().map(|v| v.actual.clone()).collect();
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
            Ok(c) if c.rules.iter().all(|r| !r.id.is_empty()) => ConfigValidation::ok(),
            Ok(_) => ConfigValidation::fail(vec!["every rule needs a non-empty id".to_string()]),
            Err(e) => ConfigValidation::fail(vec![e.to_string()]),
        }
    }

    fn default_config(&self) -> serde_json::Value {
        serde_json::json!({ "rules": [] })
    }
}
