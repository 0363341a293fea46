//! Pairwise tradeoff tables for the leading approaches.

use super::types::{ApproachTradeoff, ScoredApproach};

const AXES: &[&str] = &["friction", "impact", "patternAlignment", "security"];

/// Pairwise tradeoffs for the top 3–4 ranked approaches.
pub fn compute_tradeoffs(ranked: &[ScoredApproach]) -> Vec<ApproachTradeoff> {
    let top = &ranked[..ranked.len().min(4)];
    let mut tradeoffs = Vec::new();
    for i in 0..top.len() {
        for j in (i + 1)..top.len() {
            tradeoffs.push(tradeoff(&top[i], &top[j]));
        }
    }
    tradeoffs
}

fn axis_value(s: &ScoredApproach, axis: &str) -> f64 {
    match axis {
        "friction" => s.scores.friction,
        "impact" => s.scores.impact,
        "patternAlignment" => s.scores.pattern_alignment,
        _ => s.scores.security,
    }
}

fn tradeoff(a: &ScoredApproach, b: &ScoredApproach) -> ApproachTradeoff {
    let mut wins = Vec::new();
    let mut a_axes = Vec::new();
    let mut b_axes = Vec::new();
    for axis in AXES {
        let va = axis_value(a, axis);
        let vb = axis_value(b, axis);
        if va > vb {
            wins.push((axis.to_string(), a.approach.name.clone()));
            a_axes.push(*axis);
        } else if vb > va {
            wins.push((axis.to_string(), b.approach.name.clone()));
            b_axes.push(*axis);
        }
        // Per-axis tie: no entry.
    }

    let comparison = if a_axes.len() == b_axes.len() {
        "comparable across dimensions".to_string()
    } else if a_axes.len() > b_axes.len() {
        format!(
            "{} leads on {}; {} leads on {}",
            a.approach.name,
            join_or_none(&a_axes),
            b.approach.name,
            join_or_none(&b_axes)
        )
    } else {
        format!(
            "{} leads on {}; {} leads on {}",
            b.approach.name,
            join_or_none(&b_axes),
            a.approach.name,
            join_or_none(&a_axes)
        )
    };

    ApproachTradeoff {
        first: a.approach.name.clone(),
        second: b.approach.name.clone(),
        wins,
        comparison,
    }
}

fn join_or_none(axes: &[&str]) -> String {
    if axes.is_empty() {
        "nothing".to_string()
    } else {
        axes.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speculation::types::{ApproachScores, ApproachStrategy, SimulationApproach};

    fn scored(name: &str, friction: f64, impact: f64, alignment: f64, security: f64) -> ScoredApproach {
        ScoredApproach {
            approach: SimulationApproach {
                name: name.to_string(),
                description: String::new(),
                strategy: ApproachStrategy::Custom,
                language: None,
                target_files: Vec::new(),
                new_files: Vec::new(),
                estimated_lines: 0,
            },
            scores: ApproachScores {
                friction,
                impact,
                pattern_alignment: alignment,
                security,
                composite: 0.0,
            },
            rank: 0,
        }
    }

    #[test]
    fn pair_count_for_top_four() {
        let ranked: Vec<ScoredApproach> = (0..5)
            .map(|i| scored(&format!("a{i}"), i as f64, 0.0, 0.0, 0.0))
            .collect();
        // 4 choose 2 = 6 pairs; the 5th approach is out of scope.
        assert_eq!(compute_tradeoffs(&ranked).len(), 6);
    }

    #[test]
    fn tie_is_reported_comparable() {
        let a = scored("a", 50.0, 60.0, 50.0, 60.0);
        let b = scored("b", 60.0, 50.0, 60.0, 50.0);
        let t = tradeoff(&a, &b);
        assert_eq!(t.comparison, "comparable across dimensions");
        assert_eq!(t.wins.len(), 4);
    }

    #[test]
    fn winner_named_in_prose() {
        let a = scored("a", 90.0, 90.0, 90.0, 10.0);
        let b = scored("b", 10.0, 10.0, 10.0, 90.0);
        let t = tradeoff(&a, &b);
        assert!(t.comparison.starts_with("a leads on"));
        assert!(t.comparison.contains("security"));
    }
}
