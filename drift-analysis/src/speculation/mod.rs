//! Speculative execution — what-if scoring of candidate implementation
//! approaches before any code is written.
//!
//! A task is turned into candidate approaches (never zero: a generic
//! fallback is always available), each approach is scored on four
//! higher-is-better axes, and the ranked result carries pairwise tradeoffs
//! for the leaders plus explicit limitations naming missing data sources.

pub mod generator;
pub mod scorer;
pub mod tradeoffs;
pub mod types;

pub use generator::ApproachGenerator;
pub use scorer::ApproachScorer;
pub use tradeoffs::compute_tradeoffs;
pub use types::{
    ApproachScores, ApproachStrategy, ApproachTradeoff, ScoreWeights, ScoredApproach,
    SimulationApproach, SimulationResult, SimulationTask,
};

use drift_core::cancel::{Budget, CancellationToken};
use drift_core::errors::CancelError;
use drift_core::types::PatternSummary;

use crate::call_graph::CallGraph;

/// Orchestrates generate → score → rank → tradeoffs for one task.
pub struct SpeculativeExecutor {
    pub max_approaches: usize,
    pub weights: ScoreWeights,
}

impl SpeculativeExecutor {
    pub fn new() -> Self {
        Self {
            max_approaches: 5,
            weights: ScoreWeights::default(),
        }
    }

    /// Run the simulation. Cancellation is checked between approaches;
    /// partial results are discarded on abort.
    pub fn simulate(
        &self,
        task: &SimulationTask,
        graph: Option<&CallGraph>,
        patterns: Option<&[PatternSummary]>,
        cancel: &CancellationToken,
        budget: &Budget,
    ) -> Result<SimulationResult, CancelError> {
        let approaches = ApproachGenerator::generate(task, self.max_approaches);
        let scorer = ApproachScorer::new(graph, patterns, self.weights);

        // Approaches score concurrently; the join is here. A cancelled or
        // over-budget run discards all partial scores.
        use rayon::prelude::*;
        let mut scored = approaches
            .into_par_iter()
            .map(|approach| {
                cancel.check()?;
                budget.check()?;
                let scores = scorer.score(task, &approach);
                Ok(ScoredApproach {
                    approach,
                    scores,
                    rank: 0,
                })
            })
            .collect::<Result<Vec<_>, CancelError>>()?;

        // Rank: composite descending, stable tie-break by name.
        scored.sort_by(|a, b| {
            b.scores
                .composite
                .partial_cmp(&a.scores.composite)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.approach.name.cmp(&b.approach.name))
        });
        for (i, s) in scored.iter_mut().enumerate() {
            s.rank = i as u32 + 1;
        }

        let tradeoffs = compute_tradeoffs(&scored);

        let mut limitations = Vec::new();
        let mut confidence = 0.5f64;
        if graph.is_some() {
            confidence += 0.2;
        } else {
            limitations.push("No call graph available; impact and security are estimated".to_string());
        }
        if patterns.is_some() {
            confidence += 0.2;
        } else {
            limitations.push("No patterns available; alignment scored neutrally".to_string());
        }
        if scored.len() < 3 {
            limitations.push(format!("Only {} candidate approach(es) generated", scored.len()));
        } else {
            confidence += 0.1;
        }

        Ok(SimulationResult {
            task: task.clone(),
            approaches: scored,
            tradeoffs,
            confidence: confidence.min(1.0),
            limitations,
        })
    }
}

impl Default for SpeculativeExecutor {
    fn default() -> Self {
        Self::new()
    }
}
