//! Speculative execution integration tests: fallback generation, ranking
//! invariants, tradeoffs, and limitation reporting.

use drift_analysis::speculation::{SimulationTask, SpeculativeExecutor};
use drift_core::cancel::{Budget, CancellationToken};
use drift_core::types::{DetectionMethod, Pattern, PatternStatus, PatternSummary};

fn run(task: &str) -> drift_analysis::speculation::SimulationResult {
    SpeculativeExecutor::new()
        .simulate(
            &SimulationTask::new(task),
            None,
            None,
            &CancellationToken::new(),
            &Budget::default(),
        )
        .expect("simulation should not be cancelled")
}

/// With no call graph, no patterns, and no applicable strategy, the result
/// is exactly one "Generic Implementation" at rank 1 with both limitations.
#[test]
fn fallback_simulation() {
    let result = run("add email validation");

    assert_eq!(result.approaches.len(), 1);
    assert_eq!(result.approaches[0].approach.name, "Generic Implementation");
    assert_eq!(result.approaches[0].rank, 1);
    assert!(result
        .limitations
        .iter()
        .any(|l| l.contains("No call graph")));
    assert!(result.limitations.iter().any(|l| l.contains("No patterns")));
}

/// Ranks are a permutation of 1..n and the first approach has the highest
/// composite score.
#[test]
fn ranking_invariants() {
    let result = run("add logging and auth middleware with caching");
    assert!(!result.approaches.is_empty());

    let mut ranks: Vec<u32> = result.approaches.iter().map(|a| a.rank).collect();
    ranks.sort_unstable();
    let expected: Vec<u32> = (1..=result.approaches.len() as u32).collect();
    assert_eq!(ranks, expected);

    let top = result.approaches[0].scores.composite;
    assert!(result
        .approaches
        .iter()
        .all(|a| a.scores.composite <= top + 1e-9));
}

/// Tradeoffs cover pairwise comparisons of the leaders only.
#[test]
fn tradeoffs_for_leaders() {
    let result = run("add logging and auth middleware with caching");
    let n = result.approaches.len().min(4);
    assert_eq!(result.tradeoffs.len(), n * (n - 1) / 2);
    for t in &result.tradeoffs {
        assert!(!t.comparison.is_empty());
    }
}

/// Supplying patterns raises simulation confidence and drops the limitation.
#[test]
fn pattern_source_raises_confidence() {
    let task = SimulationTask::new("add logging");
    let executor = SpeculativeExecutor::new();
    let cancel = CancellationToken::new();

    let without = executor
        .simulate(&task, None, None, &cancel, &Budget::default())
        .unwrap();

    let mut approved = Pattern::discovered(
        "p1",
        "logging",
        "wrapper logging",
        "logging/console",
        DetectionMethod::Regex,
        0.9,
    );
    approved.status = PatternStatus::Approved;
    let summaries: Vec<PatternSummary> = vec![(&approved).into()];
    let with = executor
        .simulate(&task, None, Some(&summaries), &cancel, &Budget::default())
        .unwrap();

    assert!(with.confidence > without.confidence);
    assert!(!with.limitations.iter().any(|l| l.contains("No patterns")));
}

/// Cancellation aborts the simulation with no partial result.
#[test]
fn cancellation_discards_results() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let outcome = SpeculativeExecutor::new().simulate(
        &SimulationTask::new("add logging"),
        None,
        None,
        &cancel,
        &Budget::default(),
    );
    assert!(outcome.is_err());
}
