//! Analysis engine: detector framework, call graph, reachability,
//! impact/speculative/security scorers, and the quality-gate orchestrator.
//!
//! The scanner and the per-language parsers are external collaborators —
//! detectors receive pre-read file text plus a detected language tag, and
//! the call graph is composed from per-file JSON shards an external
//! producer writes under `.drift/lake/callgraph/files/`.

pub mod call_graph;
pub mod confidence;
pub mod detectors;
pub mod gates;
pub mod outliers;
pub mod reachability;
pub mod scorers;
pub mod speculation;

pub use call_graph::{CallGraph, CallGraphBuilder};
pub use reachability::{Reach, ReachabilityEngine, ReachabilityQuery, TraversalDirection};
