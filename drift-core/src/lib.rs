//! Core types, errors, events, configuration, and cancellation for Drift.
//!
//! Everything here is shared by the analysis, storage, and façade crates.
//! This crate has no I/O of its own beyond config file loading.

pub mod cancel;
pub mod config;
pub mod errors;
pub mod events;
pub mod types;

pub use cancel::{Budget, CancellationToken};
pub use config::DriftConfig;
