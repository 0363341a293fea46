//! Layered configuration.

pub mod analysis_config;
pub mod drift_config;
pub mod gates_config;
pub mod thresholds;

pub use analysis_config::AnalysisConfig;
pub use drift_config::{DriftConfig, OutputFormat};
pub use gates_config::{AggregationMode, GatesConfig};
pub use thresholds::Thresholds;
