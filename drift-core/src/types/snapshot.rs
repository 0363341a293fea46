//! Health snapshots — the frozen baseline regression detection compares against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pattern::PatternSummary;

/// Per-pattern health at snapshot time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternHealth {
    pub pattern_id: String,
    pub category: String,
    pub confidence: f64,
    pub locations: usize,
    pub outliers: usize,
}

impl PatternHealth {
    /// Compliance rate in percent. 100.0 when the pattern has no instances.
    pub fn compliance(&self) -> f64 {
        let total = self.locations + self.outliers;
        if total == 0 {
            100.0
        } else {
            self.locations as f64 / total as f64 * 100.0
        }
    }
}

/// An immutable summary of pattern health at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
    pub branch: String,
    pub timestamp: DateTime<Utc>,
    pub patterns: Vec<PatternHealth>,
}

impl HealthSnapshot {
    /// Capture a snapshot from pattern summaries.
    pub fn capture(
        summaries: &[PatternSummary],
        branch: impl Into<String>,
        commit_sha: Option<String>,
    ) -> Self {
        Self {
            commit_sha,
            branch: branch.into(),
            timestamp: Utc::now(),
            patterns: summaries
                .iter()
                .map(|s| PatternHealth {
                    pattern_id: s.id.clone(),
                    category: s.category.clone(),
                    confidence: s.confidence,
                    locations: s.location_count,
                    outliers: s.outlier_count,
                })
                .collect(),
        }
    }

    /// Look up a pattern's baseline health by id.
    pub fn pattern(&self, id: &str) -> Option<&PatternHealth> {
        self.patterns.iter().find(|p| p.pattern_id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compliance_percent() {
        let h = PatternHealth {
            pattern_id: "p1".into(),
            category: "errors".into(),
            confidence: 0.9,
            locations: 3,
            outliers: 1,
        };
        assert_eq!(h.compliance(), 75.0);

        let empty = PatternHealth { locations: 0, outliers: 0, ..h };
        assert_eq!(empty.compliance(), 100.0);
    }
}
