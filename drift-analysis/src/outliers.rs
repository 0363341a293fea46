//! Outlier deviation scoring.
//!
//! Fills in `deviation_score` for outliers whose detector did not supply
//! one: the z-score of the outlier file's instance count against the
//! pattern's per-file distribution.

/// Mean and population standard deviation of a sample.
fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    (mean, variance.sqrt())
}

/// Absolute z-score of `value` against `distribution`.
/// Zero spread yields 0.0 for on-mean values and a capped 4.0 otherwise.
pub fn z_score(value: f64, distribution: &[f64]) -> f64 {
    let (mean, std) = mean_std(distribution);
    if std == 0.0 {
        if (value - mean).abs() < f64::EPSILON {
            0.0
        } else {
            4.0
        }
    } else {
        ((value - mean) / std).abs()
    }
}

/// Deviation score in [0, 1]: z-score normalized against a 4σ ceiling.
pub fn deviation_score(value: f64, distribution: &[f64]) -> f64 {
    (z_score(value, distribution) / 4.0).min(1.0)
}
