//! Envelope types for façade operations.
//!
//! Every envelope derives `Default` with structurally valid empty values —
//! the stub returns exactly these, and adapters can rely on every field
//! being present.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use drift_analysis::gates::GateStatus;
use drift_core::types::{Sensitivity, Violation};

// ---- lifecycle ----

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InitializeOptions {
    pub project_root: Option<String>,
    pub config_toml: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InitializeStatus {
    pub initialized: bool,
    pub workspace_root: String,
    pub schema_version: u32,
    pub pattern_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShutdownStatus {
    pub flushed: bool,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GcStatus {
    pub removed_cache_entries: usize,
    pub reclaimed_bytes: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SetupStatus {
    pub workspace_exists: bool,
    pub call_graph_available: bool,
    pub patterns_available: bool,
    pub baseline_available: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkspaceStatus {
    pub root: String,
    pub schema_version: u32,
    pub pattern_counts: PatternCounts,
    pub callgraph_stats: CallGraphStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatternCounts {
    pub discovered: usize,
    pub approved: usize,
    pub ignored: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallGraphStatus {
    pub functions: usize,
    pub edges: usize,
    pub entry_points: usize,
    pub resolution_rate: f64,
}

// ---- scanning & analysis ----

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanOptions {
    pub paths: Vec<String>,
    pub force_full: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanStatus {
    pub files_seen: usize,
    pub files_changed: usize,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeOptions {
    pub max_phase: Option<u32>,
    pub changed_only: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeStatus {
    pub phases_run: Vec<String>,
    pub patterns_discovered: usize,
    pub violations_found: usize,
    pub duration_ms: u64,
}

/// Common scope argument for per-analysis operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisScope {
    pub files: Vec<String>,
    pub categories: Vec<String>,
}

// ---- confidence / outliers / conventions ----

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfidenceReport {
    pub pattern_id: String,
    pub confidence: f64,
    pub confidence_level: String,
    pub interval_low: f64,
    pub interval_high: f64,
    pub evidence_locations: usize,
    pub evidence_outliers: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutlierEntry {
    pub pattern_id: String,
    pub file: String,
    pub line: u32,
    pub reason: String,
    pub deviation_score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutlierReport {
    pub outliers: Vec<OutlierEntry>,
    pub total: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConventionEntry {
    pub category: String,
    pub name: String,
    pub dominance: f64,
    pub example: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConventionReport {
    pub conventions: Vec<ConventionEntry>,
}

// ---- graph analyses ----

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReachabilityRequest {
    pub function_id: String,
    pub direction: String,
    pub max_depth: Option<u32>,
    pub sensitive_only: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReachEntry {
    pub path: Vec<String>,
    pub depth: u32,
    pub table: Option<String>,
    pub sensitivity: Option<Sensitivity>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReachabilityReport {
    pub reaches: Vec<ReachEntry>,
    pub total: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaintFinding {
    pub source: String,
    pub sink: String,
    pub path: Vec<String>,
    pub severity: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaintReport {
    pub findings: Vec<TaintFinding>,
    pub sources_seen: usize,
    pub sinks_seen: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorHandlingGap {
    pub function_id: String,
    pub file: String,
    pub line: u32,
    pub kind: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorHandlingReport {
    pub gaps: Vec<ErrorHandlingGap>,
    pub handled_ratio: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestTopologyReport {
    pub tested_functions: usize,
    pub untested_functions: usize,
    pub coverage_ratio: f64,
    pub orphan_tests: Vec<String>,
}

// ---- structural analyses ----

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CouplingReport {
    pub modules: Vec<ModuleCoupling>,
    pub max_score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModuleCoupling {
    pub module: String,
    pub afferent: usize,
    pub efferent: usize,
    pub score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConstraintReport {
    pub constraints_checked: usize,
    pub satisfied: usize,
    pub violations: Vec<Violation>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContractReport {
    pub endpoints_checked: usize,
    pub mismatches: Vec<ContractMismatch>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContractMismatch {
    pub endpoint: String,
    pub expected: String,
    pub actual: String,
    pub file: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConstantsReport {
    pub magic_numbers: usize,
    pub dead_constants: usize,
    pub entries: Vec<ConstantEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConstantEntry {
    pub file: String,
    pub line: u32,
    pub value: String,
    pub kind: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WrapperReport {
    pub wrappers: Vec<WrapperEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WrapperEntry {
    pub wrapper_id: String,
    pub wrapped_id: String,
    pub kind: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DnaReport {
    pub genes: Vec<DnaGene>,
    pub health_score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DnaGene {
    pub name: String,
    pub dominance: f64,
    pub mutations: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OwaspReport {
    pub findings: Vec<OwaspFinding>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OwaspFinding {
    pub category: String,
    pub file: String,
    pub line: u32,
    pub severity: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CryptoReport {
    pub findings: Vec<CryptoFinding>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CryptoFinding {
    pub file: String,
    pub line: u32,
    pub algorithm: String,
    pub issue: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecompositionReport {
    pub suggestions: Vec<DecompositionSuggestion>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecompositionSuggestion {
    pub target: String,
    pub reason: String,
    pub proposed_modules: Vec<String>,
}

// ---- gates ----

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GateCheckOptions {
    pub policy: Option<String>,
    pub changed_files: Vec<String>,
    pub baseline: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditOptions {
    pub include_ignored: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditReport {
    pub patterns_audited: usize,
    pub duplicates: usize,
    pub auto_approvable: usize,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViolationQuery {
    pub files: Vec<String>,
    pub categories: Vec<String>,
    pub min_severity: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateReport {
    pub status: GateStatus,
    pub passed: bool,
    pub score: f64,
    pub summary: String,
    pub sections: Vec<GateReportSection>,
}

impl Default for GateReport {
    fn default() -> Self {
        Self {
            status: GateStatus::Passed,
            passed: true,
            score: 100.0,
            summary: String::new(),
            sections: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GateReportSection {
    pub gate_id: String,
    pub heading: String,
    pub body: String,
}

// ---- feedback ----

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedbackStatus {
    pub violation_id: String,
    pub acknowledged: bool,
}

// ---- mining & generation ----

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecisionReport {
    pub decisions: Vec<DecisionEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecisionEntry {
    pub id: String,
    pub title: String,
    pub category: String,
    pub first_seen: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextOptions {
    pub task: String,
    pub token_budget: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextPack {
    pub sections: Vec<ContextSection>,
    pub token_estimate: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextSection {
    pub heading: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpecOptions {
    pub scope: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpecPack {
    pub sections: Vec<ContextSection>,
}

// ---- snapshots & backups ----

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotStatus {
    pub branch: String,
    pub commit_sha: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub pattern_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackupStatus {
    pub id: String,
    pub name: String,
    pub size_bytes: u64,
    pub checksum: String,
}

// ---- bridge ----

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeStatus {
    pub connected: bool,
    pub memories: usize,
    pub last_sync: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroundingReport {
    pub query: String,
    pub grounded: Vec<GroundingEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroundingEntry {
    pub claim: String,
    pub evidence_file: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationRequest {
    pub text: String,
    pub target_vocabulary: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationReport {
    pub translated: String,
    pub unmapped_terms: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeHealth {
    pub healthy: bool,
    pub checks: Vec<BridgeHealthCheck>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeHealthCheck {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

// ---- cloud sync ----

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncReadRequest {
    pub table: String,
    pub after_cursor: Option<String>,
    pub limit: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncRows {
    pub table: String,
    pub rows: Vec<serde_json::Value>,
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncCursor {
    pub table: String,
    pub max_cursor: Option<String>,
}
