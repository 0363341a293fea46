//! Numeric thresholds. The listed defaults are part of the contract.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Thresholds {
    /// Minimum detector confidence for a result to create violations. Default: 0.7.
    pub min_pattern_confidence: f64,
    /// Reachability depth cap. Default: 10.
    pub max_impact_depth: u32,
    /// Minimum test coverage percentage. Default: 80.
    pub min_test_coverage: f64,
    /// Maximum acceptable coupling score. Default: 50.
    pub max_coupling_score: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_pattern_confidence: 0.7,
            max_impact_depth: 10,
            min_test_coverage: 80.0,
            max_coupling_score: 50.0,
        }
    }
}
