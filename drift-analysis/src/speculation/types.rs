//! Simulation task, approach, and score types.

use serde::{Deserialize, Serialize};

/// What the user wants to do, in engine terms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationTask {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Target file or module the task centers on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub constraints: Vec<String>,
}

impl SimulationTask {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }
}

/// The closed set of implementation strategies the generator proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApproachStrategy {
    Wrapper,
    Decorator,
    Middleware,
    Guard,
    Policy,
    Filter,
    Interceptor,
    PerFunction,
    Distributed,
    Custom,
}

impl ApproachStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Wrapper => "wrapper",
            Self::Decorator => "decorator",
            Self::Middleware => "middleware",
            Self::Guard => "guard",
            Self::Policy => "policy",
            Self::Filter => "filter",
            Self::Interceptor => "interceptor",
            Self::PerFunction => "per-function",
            Self::Distributed => "distributed",
            Self::Custom => "custom",
        }
    }
}

/// One candidate way to implement the task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationApproach {
    pub name: String,
    pub description: String,
    pub strategy: ApproachStrategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub target_files: Vec<String>,
    pub new_files: Vec<String>,
    pub estimated_lines: u32,
}

/// Four normalized axes, 0–100, higher is better, plus the weighted composite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproachScores {
    pub friction: f64,
    pub impact: f64,
    pub pattern_alignment: f64,
    pub security: f64,
    pub composite: f64,
}

/// Axis weights for the composite. Defaults are contract.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreWeights {
    pub friction: f64,
    pub impact: f64,
    pub pattern_alignment: f64,
    pub security: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            friction: 0.30,
            impact: 0.25,
            pattern_alignment: 0.30,
            security: 0.15,
        }
    }
}

impl ScoreWeights {
    pub fn composite(&self, s: &ApproachScores) -> f64 {
        s.friction * self.friction
            + s.impact * self.impact
            + s.pattern_alignment * self.pattern_alignment
            + s.security * self.security
    }
}

/// An approach with its scores and 1-based rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredApproach {
    pub approach: SimulationApproach,
    pub scores: ApproachScores,
    pub rank: u32,
}

/// Pairwise comparison between two leading approaches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproachTradeoff {
    pub first: String,
    pub second: String,
    /// Axis name → winning approach name (absent on a per-axis tie).
    pub wins: Vec<(String, String)>,
    pub comparison: String,
}

/// The full simulation envelope. `approaches` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub task: SimulationTask,
    pub approaches: Vec<ScoredApproach>,
    pub tradeoffs: Vec<ApproachTradeoff>,
    /// Confidence in the simulation itself, from available data sources.
    pub confidence: f64,
    pub limitations: Vec<String>,
}
