//! Tests for the Drift configuration system: layered resolution,
//! environment overrides, and validation.

use std::sync::Mutex;

use drift_core::config::{DriftConfig, OutputFormat};

/// Global mutex to serialize tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Clear all DRIFT_ env vars to prevent cross-test contamination.
fn clear_drift_env_vars() {
    for key in [
        "DRIFT_MIN_PATTERN_CONFIDENCE",
        "DRIFT_MAX_IMPACT_DEPTH",
        "DRIFT_GATE_POLICY",
        "DRIFT_OUTPUT_FORMAT",
    ] {
        std::env::remove_var(key);
    }
}

/// Layered resolution: env beats the project file, which beats defaults.
#[test]
fn test_layer_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_drift_env_vars();

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("drift.toml"),
        "[thresholds]\nminPatternConfidence = 0.6\nmaxImpactDepth = 8\n",
    )
    .unwrap();

    // Project file layer.
    let config = DriftConfig::load(dir.path()).unwrap();
    assert_eq!(config.thresholds.min_pattern_confidence, 0.6);
    assert_eq!(config.thresholds.max_impact_depth, 8);

    // Env layer overrides the project file.
    std::env::set_var("DRIFT_MIN_PATTERN_CONFIDENCE", "0.9");
    std::env::set_var("DRIFT_GATE_POLICY", "strict");
    let config = DriftConfig::load(dir.path()).unwrap();
    assert_eq!(config.thresholds.min_pattern_confidence, 0.9);
    assert_eq!(config.thresholds.max_impact_depth, 8);
    assert_eq!(config.quality_gates.policy, "strict");

    clear_drift_env_vars();
}

/// Malformed env values are ignored, not fatal.
#[test]
fn test_malformed_env_ignored() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_drift_env_vars();

    std::env::set_var("DRIFT_MAX_IMPACT_DEPTH", "not-a-number");
    let dir = tempfile::tempdir().unwrap();
    let config = DriftConfig::load(dir.path()).unwrap();
    assert_eq!(config.thresholds.max_impact_depth, 10);

    clear_drift_env_vars();
}

/// JSON project config is accepted when no TOML is present.
#[test]
fn test_json_project_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_drift_env_vars();

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("drift.json"),
        r#"{ "outputFormat": "github", "analysis": { "speculativeExecution": true } }"#,
    )
    .unwrap();

    let config = DriftConfig::load(dir.path()).unwrap();
    assert_eq!(config.output_format, OutputFormat::Github);
    assert!(config.analysis.speculative_execution);
}

/// Unknown keys are ignored for forward compatibility.
#[test]
fn test_unknown_keys_ignored() {
    let config = DriftConfig::from_toml(
        "futureFeature = true\n[thresholds]\nminPatternConfidence = 0.8\nfutureKnob = 3\n",
    )
    .unwrap();
    assert_eq!(config.thresholds.min_pattern_confidence, 0.8);
}

/// Out-of-range thresholds fail validation during load.
#[test]
fn test_validation_during_load() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_drift_env_vars();

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("drift.toml"),
        "[thresholds]\nminPatternConfidence = 2.0\n",
    )
    .unwrap();
    assert!(DriftConfig::load(dir.path()).is_err());
}

/// Serialization keeps the camelCase wire key names.
#[test]
fn test_serialized_key_names() {
    let config = DriftConfig::default();
    let json = serde_json::to_value(&config).unwrap();
    assert!(json["thresholds"]["minPatternConfidence"].is_number());
    assert!(json["analysis"]["patternCheck"].is_boolean());
    assert!(json["qualityGates"]["passThreshold"].is_number());
}
