//! Analysis phase flags.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Per-phase enable flags. All analysis phases default to on except the
/// expensive speculative phases, matching the shipped defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfig {
    #[serde(default = "default_true")]
    pub pattern_check: bool,
    #[serde(default = "default_true")]
    pub constraint_verification: bool,
    #[serde(default = "default_true")]
    pub impact_analysis: bool,
    #[serde(default = "default_true")]
    pub security_boundaries: bool,
    #[serde(default = "default_true")]
    pub test_coverage: bool,
    #[serde(default = "default_true")]
    pub module_coupling: bool,
    #[serde(default = "default_true")]
    pub error_handling: bool,
    #[serde(default = "default_true")]
    pub contract_mismatch: bool,
    #[serde(default = "default_true")]
    pub constants_analysis: bool,
    pub decision_mining: bool,
    pub pattern_trends: bool,
    pub speculative_execution: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pattern_check: true,
            constraint_verification: true,
            impact_analysis: true,
            security_boundaries: true,
            test_coverage: true,
            module_coupling: true,
            error_handling: true,
            contract_mismatch: true,
            constants_analysis: true,
            decision_mining: false,
            pattern_trends: false,
            speculative_execution: false,
        }
    }
}
