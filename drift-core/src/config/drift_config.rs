//! Top-level Drift configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{AnalysisConfig, GatesConfig, Thresholds};
use crate::errors::ConfigError;

/// Report output format selector passed through to external sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Github,
    Gitlab,
    Sarif,
}

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides from the embedding adapter
/// 2. Environment variables (`DRIFT_*`)
/// 3. Project config (`drift.toml` or `drift.json` in the project root)
/// 4. User config (`~/.drift/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DriftConfig {
    pub analysis: AnalysisConfig,
    pub quality_gates: GatesConfig,
    pub output_format: OutputFormat,
    pub thresholds: Thresholds,
}

impl DriftConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(user_path) = user_config_path() {
            if user_path.exists() {
                // User config problems are warnings, not fatal.
                match Self::from_toml_file(&user_path) {
                    Ok(user) => config = user,
                    Err(e) => tracing::warn!(error = %e, "skipping unreadable user config"),
                }
            }
        }

        let toml_path = root.join("drift.toml");
        let json_path = root.join("drift.json");
        if toml_path.exists() {
            config = Self::from_toml_file(&toml_path)?;
        } else if json_path.exists() {
            config = Self::from_json_file(&json_path)?;
        }

        Self::apply_env_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML string. Unknown keys are ignored (forward-compatible).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Parse a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Pattern: `DRIFT_MIN_PATTERN_CONFIDENCE`, `DRIFT_MAX_IMPACT_DEPTH`,
    /// `DRIFT_GATE_POLICY`, `DRIFT_OUTPUT_FORMAT`.
    fn apply_env_overrides(config: &mut DriftConfig) {
        if let Ok(val) = std::env::var("DRIFT_MIN_PATTERN_CONFIDENCE") {
            if let Ok(v) = val.parse::<f64>() {
                config.thresholds.min_pattern_confidence = v;
            }
        }
        if let Ok(val) = std::env::var("DRIFT_MAX_IMPACT_DEPTH") {
            if let Ok(v) = val.parse::<u32>() {
                config.thresholds.max_impact_depth = v;
            }
        }
        if let Ok(val) = std::env::var("DRIFT_GATE_POLICY") {
            config.quality_gates.policy = val;
        }
        if let Ok(val) = std::env::var("DRIFT_OUTPUT_FORMAT") {
            if let Ok(v) = serde_json::from_value(serde_json::Value::String(val)) {
                config.output_format = v;
            }
        }
    }

    /// Validate threshold ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.thresholds.min_pattern_confidence) {
            return Err(ConfigError::ValidationFailed {
                field: "thresholds.minPatternConfidence".to_string(),
                message: "must be between 0.0 and 1.0".to_string(),
            });
        }
        if !(0.0..=100.0).contains(&self.thresholds.min_test_coverage) {
            return Err(ConfigError::ValidationFailed {
                field: "thresholds.minTestCoverage".to_string(),
                message: "must be between 0 and 100".to_string(),
            });
        }
        if !(0.0..=100.0).contains(&self.quality_gates.pass_threshold) {
            return Err(ConfigError::ValidationFailed {
                field: "qualityGates.passThreshold".to_string(),
                message: "must be between 0 and 100".to_string(),
            });
        }
        Ok(())
    }
}

/// Returns the user config path: `~/.drift/config.toml`.
fn user_config_path() -> Option<std::path::PathBuf> {
    home_dir().map(|h| h.join(".drift").join("config.toml"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(std::path::PathBuf::from)
}
