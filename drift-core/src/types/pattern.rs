//! The pattern model — the unit of everything the engine learns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{ConfidenceLevel, DetectionMethod, PatternStatus, Severity};

/// A source location. `line` is 1-based; `column` is 0-based when present.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub file: String,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
}

impl Location {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column: None,
            end_line: None,
            end_column: None,
        }
    }

    /// A location is valid when it names a file and a 1-based line.
    pub fn is_valid(&self) -> bool {
        !self.file.is_empty() && self.line > 0
    }
}

/// An instance that matches a pattern's detector but deviates from its form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outlier {
    #[serde(flatten)]
    pub location: Location,
    pub reason: String,
    pub deviation_score: f64,
}

/// Per-pattern bookkeeping. `version` is a monotonic edit counter, bumped on
/// every mutating write; the workspace schema version lives in config.json.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatternMetadata {
    pub version: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<serde_json::Value>,
}

/// A recurring code shape discovered by a detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub id: String,
    pub category: String,
    pub subcategory: String,
    pub name: String,
    pub description: String,
    pub detector_id: String,
    pub detector_name: String,
    pub detection_method: DetectionMethod,
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub locations: Vec<Location>,
    pub outliers: Vec<Outlier>,
    pub status: PatternStatus,
    pub severity: Severity,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    pub tags: Vec<String>,
    pub auto_fixable: bool,
    pub metadata: PatternMetadata,
}

impl Pattern {
    /// Create a freshly discovered pattern with consistent derived fields.
    pub fn discovered(
        id: impl Into<String>,
        category: impl Into<String>,
        name: impl Into<String>,
        detector_id: impl Into<String>,
        detection_method: DetectionMethod,
        confidence: f64,
    ) -> Self {
        let now = Utc::now();
        let confidence = confidence.clamp(0.0, 1.0);
        Self {
            id: id.into(),
            category: category.into(),
            subcategory: String::new(),
            name: name.into(),
            description: String::new(),
            detector_id: detector_id.into(),
            detector_name: String::new(),
            detection_method,
            confidence,
            confidence_level: ConfidenceLevel::from_confidence(confidence),
            locations: Vec::new(),
            outliers: Vec::new(),
            status: PatternStatus::Discovered,
            severity: Severity::Info,
            first_seen: now,
            last_seen: now,
            approved_at: None,
            approved_by: None,
            tags: Vec::new(),
            auto_fixable: false,
            metadata: PatternMetadata::default(),
        }
    }

    /// Recompute derived fields after a mutation: confidence bucket, edit
    /// counter, and `last_seen` ordering against `first_seen`.
    pub fn touch(&mut self) {
        self.confidence = self.confidence.clamp(0.0, 1.0);
        self.confidence_level = ConfidenceLevel::from_confidence(self.confidence);
        self.metadata.version += 1;
        let now = Utc::now();
        if now > self.last_seen {
            self.last_seen = now;
        }
        if self.last_seen < self.first_seen {
            self.last_seen = self.first_seen;
        }
    }

    /// Compliance rate: locations / (locations + outliers). 1.0 when empty.
    pub fn compliance(&self) -> f64 {
        let total = self.locations.len() + self.outliers.len();
        if total == 0 {
            1.0
        } else {
            self.locations.len() as f64 / total as f64
        }
    }

    /// Structural consistency check used by repository debug assertions.
    pub fn invariants_hold(&self) -> bool {
        self.last_seen >= self.first_seen
            && (self.approved_at.is_some() == (self.status == PatternStatus::Approved))
            && self.confidence_level == ConfidenceLevel::from_confidence(self.confidence)
    }
}

/// Compact pattern projection for listings and snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternSummary {
    pub id: String,
    pub category: String,
    pub name: String,
    pub status: PatternStatus,
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub severity: Severity,
    pub location_count: usize,
    pub outlier_count: usize,
}

impl From<&Pattern> for PatternSummary {
    fn from(p: &Pattern) -> Self {
        Self {
            id: p.id.clone(),
            category: p.category.clone(),
            name: p.name.clone(),
            status: p.status,
            confidence: p.confidence,
            confidence_level: p.confidence_level,
            severity: p.severity,
            location_count: p.locations.len(),
            outlier_count: p.outliers.len(),
        }
    }
}
