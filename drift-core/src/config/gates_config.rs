//! Quality-gate policy configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// How gate results combine into an overall verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    #[default]
    AllPass,
    Weighted,
    AnyPass,
}

/// Per-policy gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatesConfig {
    /// Named policy to run. Default: "default".
    pub policy: String,
    pub aggregation: AggregationMode,
    /// Per-gate enable flags, keyed by gate id.
    pub enabled_gates: HashMap<String, bool>,
    /// Per-gate weights for `Weighted` aggregation.
    pub gate_weights: HashMap<String, f64>,
    /// Composite pass threshold (0–100) for `Weighted` aggregation.
    pub pass_threshold: f64,
    /// Per-gate config blobs, keyed by gate id, validated by the gate itself.
    pub gate_config: HashMap<String, serde_json::Value>,
}

impl Default for GatesConfig {
    fn default() -> Self {
        Self {
            policy: "default".to_string(),
            aggregation: AggregationMode::AllPass,
            enabled_gates: HashMap::new(),
            gate_weights: HashMap::new(),
            pass_threshold: 70.0,
            gate_config: HashMap::new(),
        }
    }
}

impl GatesConfig {
    /// A gate is enabled unless explicitly disabled.
    pub fn gate_enabled(&self, gate_id: &str) -> bool {
        self.enabled_gates.get(gate_id).copied().unwrap_or(true)
    }

    /// Weight for `Weighted` aggregation, defaulting to 1.0.
    pub fn gate_weight(&self, gate_id: &str) -> f64 {
        self.gate_weights.get(gate_id).copied().unwrap_or(1.0)
    }
}
