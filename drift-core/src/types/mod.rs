//! Shared data model: patterns, violations, health snapshots, closed enums.

pub mod enums;
pub mod pattern;
pub mod snapshot;
pub mod violation;

pub use enums::{
    ConfidenceLevel, DetectionMethod, PatternStatus, RiskLevel, Sensitivity, Severity,
    ViolationSeverity,
};
pub use pattern::{Location, Outlier, Pattern, PatternMetadata, PatternSummary};
pub use snapshot::{HealthSnapshot, PatternHealth};
pub use violation::{Fix, Violation};
