//! Gate: pattern compliance — outlier pressure against approved patterns.

use serde::Deserialize;

use drift_core::types::{PatternStatus, Violation, ViolationSeverity};

use super::types::{ConfigValidation, GateInput, GateResult, QualityGate};

const ID: &str = "pattern-compliance";
const NAME: &str = "Pattern Compliance";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Config {
    /// Compliance rate below this fails the gate.
    min_compliance: f64,
    /// Total outliers above this fails the gate.
    max_outliers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_compliance: 0.8,
            max_outliers: 10,
        }
    }
}

fn parse(config: &serde_json::Value) -> Config {
    if config.is_null() {
        Config::default()
    } else {
        serde_json::from_value(config.clone()).unwrap_or_default()
    }
}

pub struct PatternComplianceGate;

impl QualityGate for PatternComplianceGate {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Measures outlier count and compliance rate against approved patterns"
    }

    fn execute(&self, input: &GateInput, config: &serde_json::Value) -> GateResult {
        let config = parse(config);
        let approved: Vec<_> = input
            .patterns
            .iter()
            .filter(|p| p.status == PatternStatus::Approved)
            .collect();

        if approved.is_empty() {
            return GateResult::pass(ID, NAME, 100.0, "No approved patterns to enforce");
        }

        let locations: usize = approved.iter().map(|p| p.locations.len()).sum();
        let outliers: usize = approved.iter().map(|p| p.outliers.len()).sum();
        let total = locations + outliers;
        let compliance = if total == 0 {
            1.0
        } else {
            locations as f64 / total as f64
        };
        let score = compliance * 100.0;

        let mut violations: Vec<Violation> = Vec::new();
        for pattern in &approved {
            for outlier in &pattern.outliers {
                let mut v = Violation::new(
                    format!("{}:{}:{}", pattern.id, outlier.location.file, outlier.location.line),
                    outlier.location.file.clone(),
                    outlier.location.line,
                    pattern.id.clone(),
                    ViolationSeverity::Warning,
                );
                v.category = pattern.category.clone();
                v.expected = pattern.name.clone();
                v.actual = outlier.reason.clone();
                v.confidence = pattern.confidence;
                violations.push(v);
            }
        }

        let summary = format!(
            "{outliers} outlier(s) across {} approved pattern(s), compliance {:.1}%",
            approved.len(),
            compliance * 100.0
        );

        if compliance < config.min_compliance || outliers > config.max_outliers {
            GateResult::fail(ID, NAME, score, summary, violations)
        } else if outliers > 0 {
            let warnings = violations.iter().take(5).map(|v| v.actual.clone()).collect();
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
            Ok(c) if (0.0..=1.0).contains(&c.min_compliance) => ConfigValidation::ok(),
            Ok(_) => ConfigValidation::fail(vec!["minCompliance must be in [0, 1]".to_string()]),
            Err(e) => ConfigValidation::fail(vec![e.to_string()]),
        }
    }

    fn default_config(&self) -> serde_json::Value {
        serde_json::json!({ "minCompliance": 0.8, "maxOutliers": 10 })
    }
}
