//! Gate: regression detection — current pattern health vs. a baseline snapshot.
//!
//! Severity classification per axis threshold:
//! severe when any axis exceeds twice its threshold, moderate when any axis
//! exceeds the threshold, minor otherwise. The gate fails on any severe
//! regression, any regression in a critical category, or more than three
//! moderates.

use serde::{Deserialize, Serialize};

use drift_core::types::{Violation, ViolationSeverity};

use super::types::{ConfigValidation, GateInput, GateResult, QualityGate};

const ID: &str = "regression-detection";
const NAME: &str = "Regression Detection";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Config {
    /// Confidence drop threshold, in percentage points.
    max_confidence_drop: f64,
    /// Compliance drop threshold, in percentage points.
    max_compliance_drop: f64,
    /// New outliers per pattern threshold.
    max_new_outliers_per_pattern: i64,
    critical_categories: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_confidence_drop: 10.0,
            max_compliance_drop: 10.0,
            max_new_outliers_per_pattern: 5,
            critical_categories: vec!["security".to_string(), "auth".to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum RegressionClass {
    Severe,
    Moderate,
    Minor,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Regression {
    pattern_id: String,
    category: String,
    class: RegressionClass,
    confidence_delta: f64,
    compliance_delta: f64,
    new_outliers: i64,
}

pub struct RegressionDetectionGate;

impl RegressionDetectionGate {
    fn classify(
        config: &Config,
        confidence_drop: f64,
        compliance_drop: f64,
        new_outliers: i64,
    ) -> Option<RegressionClass> {
        let regressed = confidence_drop > 0.0 || compliance_drop > 0.0 || new_outliers > 0;
        if !regressed {
            return None;
        }
        let severe = confidence_drop > config.max_confidence_drop * 2.0
            || compliance_drop > config.max_compliance_drop * 2.0
            || new_outliers > config.max_new_outliers_per_pattern * 2;
        if severe {
            return Some(RegressionClass::Severe);
        }
        let moderate = confidence_drop > config.max_confidence_drop
            || compliance_drop > config.max_compliance_drop
            || new_outliers > config.max_new_outliers_per_pattern;
        if moderate {
            Some(RegressionClass::Moderate)
        } else {
            Some(RegressionClass::Minor)
        }
    }
}

impl QualityGate for RegressionDetectionGate {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Compares current pattern health against the stored baseline snapshot"
    }

    fn execute(&self, input: &GateInput, config: &serde_json::Value) -> GateResult {
        let config: Config = if config.is_null() {
            Config::default()
        } else {
            serde_json::from_value(config.clone()).unwrap_or_default()
        };

        let Some(baseline) = &input.baseline else {
            return GateResult::pass(ID, NAME, 100.0, "no baseline");
        };

        let mut regressions: Vec<Regression> = Vec::new();
        let mut improvements = 0usize;

        for pattern in &input.patterns {
            let Some(base) = baseline.pattern(&pattern.id) else {
                continue; // New pattern: nothing to regress against.
            };
            let confidence_delta = (base.confidence - pattern.confidence) * 100.0;
            let current_compliance = pattern.compliance() * 100.0;
            let compliance_delta = base.compliance() - current_compliance;
            let new_outliers = pattern.outliers.len() as i64 - base.outliers as i64;

            match Self::classify(&config, confidence_delta, compliance_delta, new_outliers) {
                Some(class) => regressions.push(Regression {
                    pattern_id: pattern.id.clone(),
                    category: pattern.category.clone(),
                    class,
                    confidence_delta,
                    compliance_delta,
                    new_outliers,
                }),
                None => {
                    if confidence_delta < 0.0 || compliance_delta < 0.0 || new_outliers < 0 {
                        improvements += 1;
                    }
                }
            }
        }

        let severe = regressions
            .iter()
            .filter(|r| r.class == RegressionClass::Severe)
            .count();
        let moderate = regressions
            .iter()
            .filter(|r| r.class == RegressionClass::Moderate)
            .count();
        let minor = regressions.len() - severe - moderate;
        let critical: Vec<&Regression> = regressions
            .iter()
            .filter(|r| config.critical_categories.contains(&r.category))
            .collect();

        let score = (100.0 - severe as f64 * 20.0 - moderate as f64 * 10.0 - minor as f64 * 3.0
            + (improvements as f64).min(10.0))
        .clamp(0.0, 100.0);

        let violations: Vec<Violation> = regressions
            .iter()
            .map(|r| {
                let severity = match r.class {
                    RegressionClass::Severe => ViolationSeverity::Error,
                    RegressionClass::Moderate => ViolationSeverity::Warning,
                    RegressionClass::Minor => ViolationSeverity::Info,
                };
                let mut v = Violation::new(
                    format!("regression:{}", r.pattern_id),
                    String::new(),
                    1,
                    r.pattern_id.clone(),
                    severity,
                );
                v.category = r.category.clone();
                v.expected = "pattern health at or above baseline".to_string();
                v.actual = format!(
                    "confidence -{:.1}pt, compliance -{:.1}pt, {} new outlier(s)",
                    r.confidence_delta.max(0.0),
                    r.compliance_delta.max(0.0),
                    r.new_outliers.max(0)
                );
                v
            })
            .collect();

        let details = serde_json::json!({
            "severe": severe,
            "moderate": moderate,
            "minor": minor,
            "improvements": improvements,
            "regressions": regressions,
        });

        let failed = severe > 0 || !critical.is_empty() || moderate > 3;
        let summary = if severe > 0 {
            format!("{severe} severe regression(s), {moderate} moderate, {minor} minor")
        } else if failed {
            format!(
                "{} regression(s) in critical categories, {moderate} moderate",
                critical.len()
            )
        } else if regressions.is_empty() {
            "no regressions against baseline".to_string()
        } else {
            format!("{moderate} moderate, {minor} minor regression(s)")
        };

        if failed {
            GateResult::fail(ID, NAME, score, summary, violations).with_details(details)
        } else if !regressions.is_empty() {
            let warnings = regressions
                .iter()
                .take(5)
                .map(|r| format!("{} regressed ({:?})", r.pattern_id, r.class))
                .collect();
            let mut result = GateResult::warn(ID, NAME, score, summary, warnings);
            result.violations = violations;
            result.with_details(details)
        } else {
            GateResult::pass(ID, NAME, score, summary).with_details(details)
        }
    }

    fn validate_config(&self, config: &serde_json::Value) -> ConfigValidation {
        if config.is_null() {
            return ConfigValidation::ok();
        }
        match serde_json::from_value::<Config>(config.clone()) {
            Ok(c) if c.max_confidence_drop > 0.0 && c.max_compliance_drop > 0.0 => {
                ConfigValidation::ok()
            }
            Ok(_) => ConfigValidation::fail(vec!["drop thresholds must be positive".to_string()]),
            Err(e) => ConfigValidation::fail(vec![e.to_string()]),
        }
    }

    fn default_config(&self) -> serde_json::Value {
        serde_json::json!({
            "maxConfidenceDrop": 10.0,
            "maxComplianceDrop": 10.0,
            "maxNewOutliersPerPattern": 5,
            "criticalCategories": ["security", "auth"],
        })
    }
}
