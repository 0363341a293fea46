//! Call graph node, edge, and overlay types.

use serde::{Deserialize, Serialize};

use drift_core::types::Sensitivity;

/// What kind of callable a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    #[default]
    Function,
    Method,
    Handler,
    Constructor,
    Entry,
}

/// Entry-point classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPointKind {
    Api,
    Ui,
    Cli,
    Worker,
    Webhook,
    Other,
}

/// HTTP route details for API entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRoute {
    pub method: String,
    pub path: String,
}

/// Full entry-point record attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPointInfo {
    pub kind: EntryPointKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<HttpRoute>,
}

/// A function in the cross-language graph.
///
/// `id` is stable: producers either supply one or it is synthesized as
/// `"<file>:<name>"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionNode {
    pub id: String,
    pub file: String,
    pub name: String,
    pub line: u32,
    #[serde(rename = "type", default)]
    pub kind: FunctionKind,
    #[serde(default)]
    pub is_entry_point: bool,
    #[serde(default)]
    pub accesses_sensitive_data: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<EntryPointInfo>,
}

/// Where a call happens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSite {
    pub file: String,
    pub line: u32,
}

/// A directed call. Parallel edges collapse at the same call site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallEdge {
    pub caller: String,
    pub callee: String,
    pub call_site: CallSite,
}

/// How a function touches stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOperation {
    Read,
    Write,
    Delete,
}

/// Data-access overlay attached to a node via its owning-function id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataAccess {
    pub table: String,
    #[serde(default)]
    pub fields: Vec<String>,
    pub operation: DataOperation,
    #[serde(default = "default_sensitivity")]
    pub sensitivity: Sensitivity,
}

fn default_sensitivity() -> Sensitivity {
    Sensitivity::Unknown
}
