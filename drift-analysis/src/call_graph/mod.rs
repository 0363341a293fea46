//! Cross-language call graph — immutable after build.
//!
//! An external scanner writes per-file JSON shards under
//! `.drift/lake/callgraph/files/`; the builder parses shards in parallel and
//! merges them once into an immutable graph. Rebuilds replace the whole
//! graph behind an `Arc` swap — downstream consumers hold snapshots.

pub mod graph;
pub mod shards;
pub mod types;

pub use graph::{CallGraph, CallGraphStats};
pub use shards::{CallGraphBuilder, ShardCall, ShardFile, ShardFunction};
pub use types::{
    CallEdge, CallSite, DataAccess, DataOperation, EntryPointInfo, EntryPointKind, FunctionKind,
    FunctionNode, HttpRoute,
};
