//! Four-axis approach scoring. Higher is always better.

use drift_core::types::{PatternStatus, PatternSummary};

use crate::call_graph::CallGraph;
use crate::scorers::{ImpactScorer, SecurityScorer};

use super::types::{ApproachScores, ScoreWeights, SimulationApproach, SimulationTask};

/// Scores an approach against whatever data sources are present.
/// Missing sources degrade to neutral estimates, never to errors.
pub struct ApproachScorer<'a> {
    graph: Option<&'a CallGraph>,
    patterns: Option<&'a [PatternSummary]>,
    weights: ScoreWeights,
}

impl<'a> ApproachScorer<'a> {
    pub fn new(
        graph: Option<&'a CallGraph>,
        patterns: Option<&'a [PatternSummary]>,
        weights: ScoreWeights,
    ) -> Self {
        Self {
            graph,
            patterns,
            weights,
        }
    }

    pub fn score(&self, task: &SimulationTask, approach: &SimulationApproach) -> ApproachScores {
        let mut scores = ApproachScores {
            friction: self.friction(approach),
            impact: self.impact(approach),
            pattern_alignment: self.pattern_alignment(task, approach),
            security: self.security(approach),
            composite: 0.0,
        };
        scores.composite = self.weights.composite(&scores);
        scores
    }

    /// Code churn, testing effort, learning curve — all approximated from
    /// the approach's own estimates. Less churn scores higher.
    fn friction(&self, approach: &SimulationApproach) -> f64 {
        let churn = approach.target_files.len() as f64 * 8.0
            + approach.new_files.len() as f64 * 10.0
            + approach.estimated_lines as f64 / 10.0;
        (100.0 - churn).clamp(0.0, 100.0)
    }

    /// Inverse of the impact risk score.
    fn impact(&self, approach: &SimulationApproach) -> f64 {
        let scorer = ImpactScorer::default();
        let metrics = match self.graph {
            Some(graph) => scorer.score(graph, &approach.target_files),
            None => scorer.estimate_without_graph(&approach.target_files),
        };
        (100.0 - metrics.risk_score).clamp(0.0, 100.0)
    }

    /// Alignment with approved patterns: category match and strategy echo.
    /// Neutral 50 when no pattern source is available.
    fn pattern_alignment(&self, task: &SimulationTask, approach: &SimulationApproach) -> f64 {
        let Some(patterns) = self.patterns else {
            return 50.0;
        };
        let approved: Vec<&PatternSummary> = patterns
            .iter()
            .filter(|p| p.status == PatternStatus::Approved)
            .collect();
        if approved.is_empty() {
            return 50.0;
        }
        let mut score: f64 = 50.0;
        if let Some(category) = &task.category {
            if approved.iter().any(|p| &p.category == category) {
                score += 25.0;
            }
        }
        let strategy = approach.strategy.name();
        if approved
            .iter()
            .any(|p| p.name.to_ascii_lowercase().contains(strategy))
        {
            score += 25.0;
        }
        score.min(100.0)
    }

    /// Inverse of the security risk score. Without a graph, fall back to a
    /// lexical look at the touched paths.
    fn security(&self, approach: &SimulationApproach) -> f64 {
        match self.graph {
            Some(graph) => {
                let metrics = SecurityScorer::default().score(graph, &approach.target_files);
                (100.0 - metrics.security_risk).clamp(0.0, 100.0)
            }
            None => {
                let sensitive = approach
                    .target_files
                    .iter()
                    .chain(approach.new_files.iter())
                    .filter(|f| {
                        let lower = f.to_ascii_lowercase();
                        lower.contains("auth") || lower.contains("password") || lower.contains("token")
                    })
                    .count();
                (100.0 - sensitive as f64 * 20.0).clamp(0.0, 100.0)
            }
        }
    }
}
