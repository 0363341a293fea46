//! Bayesian confidence refinement via a Beta posterior.
//!
//! Prior: Beta(1, 1) — uniform. Posterior: Beta(1 + matches, 1 + outliers).
//! The posterior mean refines a pattern's raw confidence as evidence
//! accumulates; the credible interval quantifies how settled it is.

use serde::{Deserialize, Serialize};
use statrs::distribution::{Beta, ContinuousCDF};

/// A refined confidence with its 95% credible interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceInterval {
    pub mean: f64,
    pub low: f64,
    pub high: f64,
}

/// Posterior parameters from match/outlier evidence.
pub fn posterior_params(matches: u64, outliers: u64) -> (f64, f64) {
    (1.0 + matches as f64, 1.0 + outliers as f64)
}

/// Posterior mean: alpha / (alpha + beta), guarded against degenerate input.
pub fn posterior_mean(alpha: f64, beta: f64) -> f64 {
    let sum = alpha + beta;
    if sum <= 0.0 || !sum.is_finite() {
        return 0.5;
    }
    let mean = alpha / sum;
    if mean.is_finite() {
        mean.clamp(0.0, 1.0)
    } else {
        0.5
    }
}

/// Credible interval via the inverse CDF. Returns (0, 1) on invalid
/// parameters, and a collapsed interval for extreme evidence where the
/// quantile computation would lose precision.
pub fn credible_interval(alpha: f64, beta_param: f64, level: f64) -> (f64, f64) {
    if alpha <= 0.0 || beta_param <= 0.0 || !alpha.is_finite() || !beta_param.is_finite() {
        return (0.0, 1.0);
    }
    if alpha > 1e6 || beta_param > 1e6 {
        let mean = alpha / (alpha + beta_param);
        let epsilon = 1e-6;
        return ((mean - epsilon).max(0.0), (mean + epsilon).min(1.0));
    }

    let tail = (1.0 - level) / 2.0;
    match Beta::new(alpha, beta_param) {
        Ok(dist) => {
            let low = dist.inverse_cdf(tail);
            let high = dist.inverse_cdf(1.0 - tail);
            let low = if low.is_finite() { low.clamp(0.0, 1.0) } else { 0.0 };
            let high = if high.is_finite() { high.clamp(0.0, 1.0) } else { 1.0 };
            (low, high)
        }
        Err(_) => (0.0, 1.0),
    }
}

/// Refine a pattern's confidence from its location/outlier counts.
pub fn refine(matches: u64, outliers: u64) -> ConfidenceInterval {
    let (alpha, beta) = posterior_params(matches, outliers);
    let (low, high) = credible_interval(alpha, beta, 0.95);
    ConfidenceInterval {
        mean: posterior_mean(alpha, beta),
        low,
        high,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_prior_is_half() {
        let ci = refine(0, 0);
        assert!((ci.mean - 0.5).abs() < 1e-10);
        assert!(ci.low < 0.1 && ci.high > 0.9);
    }

    #[test]
    fn evidence_moves_the_mean() {
        let ci = refine(8, 2);
        assert!((ci.mean - 0.75).abs() < 1e-10);
    }

    #[test]
    fn more_evidence_narrows_the_interval() {
        let wide = refine(2, 2);
        let narrow = refine(20, 20);
        assert!((narrow.high - narrow.low) < (wide.high - wide.low));
    }

    #[test]
    fn extreme_evidence_stays_finite() {
        let ci = refine(2_000_000, 1);
        assert!(ci.mean.is_finite() && ci.mean > 0.99);
        assert!(ci.low <= ci.high);
    }
}
