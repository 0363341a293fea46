//! The public façade: one trait enumerating every operation exposed to
//! external adapters (CLI, MCP tools, IDE integrations), so a new adapter
//! can be written against a single table of contracts.
//!
//! Operation names, argument order, and field names are the wire contract —
//! downstream adapters depend on them verbatim. Errors are structured
//! values, never panics; the [`StubFacade`] implements every operation with
//! structurally valid empty defaults and is both the bootstrap fallback and
//! the basis for adapter tests.

pub mod stub;
pub mod types;

pub use stub::StubFacade;
pub use types::*;

use drift_analysis::gates::QualityGateResult;
use drift_analysis::scorers::{ImpactMetrics, SecurityMetrics};
use drift_analysis::speculation::{SimulationResult, SimulationTask};
use drift_core::types::{Pattern, PatternSummary, Violation};
use drift_storage::backup::BackupMetadata;
use drift_storage::repository::{QueryOptions, QueryResult};

/// Structured façade errors. `LicenseDenied` is the optional guard outcome —
/// a value the caller inspects, never an exception.
#[derive(Debug, thiserror::Error)]
pub enum FacadeError {
    #[error("Operation requires an initialized engine")]
    NotInitialized,

    #[error("License denied for feature '{feature}' (tier: {tier})")]
    LicenseDenied { feature: String, tier: String },

    #[error("{message}")]
    Internal { message: String },
}

pub type FacadeResult<T> = Result<T, FacadeError>;

/// Every operation the engine exposes. Implementations must return complete
/// envelopes — no operation may omit a documented field.
pub trait DriftFacade: Send + Sync {
    // ---- lifecycle ----
    fn initialize(&self, options: InitializeOptions) -> FacadeResult<InitializeStatus>;
    fn shutdown(&self) -> FacadeResult<ShutdownStatus>;
    fn gc(&self) -> FacadeResult<GcStatus>;
    fn setup_status(&self) -> FacadeResult<SetupStatus>;
    fn workspace_status(&self) -> FacadeResult<WorkspaceStatus>;

    // ---- scanning & analysis phases ----
    fn scan(&self, options: ScanOptions) -> FacadeResult<ScanStatus>;
    fn analyze(&self, options: AnalyzeOptions) -> FacadeResult<AnalyzeStatus>;

    // ---- patterns ----
    fn list_patterns(&self, query: QueryOptions) -> FacadeResult<QueryResult>;
    fn get_pattern(&self, id: String) -> FacadeResult<Option<Pattern>>;
    fn get_pattern_summaries(&self) -> FacadeResult<Vec<PatternSummary>>;
    fn approve_pattern(&self, id: String, by: Option<String>) -> FacadeResult<Pattern>;
    fn ignore_pattern(&self, id: String) -> FacadeResult<Pattern>;
    fn revert_pattern(&self, id: String) -> FacadeResult<Pattern>;
    fn delete_pattern(&self, id: String) -> FacadeResult<bool>;

    // ---- confidence / outliers / conventions ----
    fn get_confidence(&self, pattern_id: String) -> FacadeResult<ConfidenceReport>;
    fn list_outliers(&self, pattern_id: Option<String>) -> FacadeResult<OutlierReport>;
    fn list_conventions(&self) -> FacadeResult<ConventionReport>;

    // ---- graph analyses ----
    fn reachability(&self, query: ReachabilityRequest) -> FacadeResult<ReachabilityReport>;
    fn taint_analysis(&self, options: AnalysisScope) -> FacadeResult<TaintReport>;
    fn error_handling_analysis(&self, options: AnalysisScope) -> FacadeResult<ErrorHandlingReport>;
    fn impact_analysis(&self, changed_files: Vec<String>) -> FacadeResult<ImpactMetrics>;
    fn security_analysis(&self, target_files: Vec<String>) -> FacadeResult<SecurityMetrics>;
    fn test_topology_analysis(&self, options: AnalysisScope) -> FacadeResult<TestTopologyReport>;

    // ---- structural analyses ----
    fn coupling_analysis(&self, options: AnalysisScope) -> FacadeResult<CouplingReport>;
    fn constraint_analysis(&self, options: AnalysisScope) -> FacadeResult<ConstraintReport>;
    fn contract_analysis(&self, options: AnalysisScope) -> FacadeResult<ContractReport>;
    fn constants_analysis(&self, options: AnalysisScope) -> FacadeResult<ConstantsReport>;
    fn wrapper_analysis(&self, options: AnalysisScope) -> FacadeResult<WrapperReport>;
    fn dna_analysis(&self, options: AnalysisScope) -> FacadeResult<DnaReport>;
    fn owasp_analysis(&self, options: AnalysisScope) -> FacadeResult<OwaspReport>;
    fn crypto_analysis(&self, options: AnalysisScope) -> FacadeResult<CryptoReport>;
    fn decomposition_analysis(&self, options: AnalysisScope) -> FacadeResult<DecompositionReport>;

    // ---- quality gates ----
    fn gate_check(&self, options: GateCheckOptions) -> FacadeResult<QualityGateResult>;
    fn audit(&self, options: AuditOptions) -> FacadeResult<AuditReport>;
    fn list_violations(&self, options: ViolationQuery) -> FacadeResult<Vec<Violation>>;
    fn gate_report(&self, options: GateCheckOptions) -> FacadeResult<GateReport>;

    // ---- feedback ----
    fn dismiss_violation(&self, id: String, reason: Option<String>) -> FacadeResult<FeedbackStatus>;
    fn mark_violation_fixed(&self, id: String) -> FacadeResult<FeedbackStatus>;
    fn suppress_violation(&self, id: String, until: Option<String>) -> FacadeResult<FeedbackStatus>;

    // ---- speculative execution ----
    fn simulate(&self, task: SimulationTask) -> FacadeResult<SimulationResult>;

    // ---- mining & generation ----
    fn mine_decisions(&self, options: AnalysisScope) -> FacadeResult<DecisionReport>;
    fn generate_context(&self, options: ContextOptions) -> FacadeResult<ContextPack>;
    fn generate_spec(&self, options: SpecOptions) -> FacadeResult<SpecPack>;

    // ---- snapshots & backups ----
    fn capture_snapshot(&self, branch: String, commit_sha: Option<String>)
        -> FacadeResult<SnapshotStatus>;
    fn list_snapshots(&self) -> FacadeResult<Vec<SnapshotStatus>>;
    fn create_backup(&self, reason: String) -> FacadeResult<BackupStatus>;
    fn list_backups(&self) -> FacadeResult<Vec<BackupMetadata>>;
    fn restore_backup(&self, id: String) -> FacadeResult<BackupStatus>;
    fn delete_backup(&self, id: String, confirm: String) -> FacadeResult<bool>;

    // ---- bridge ----
    fn bridge_status(&self) -> FacadeResult<BridgeStatus>;
    fn bridge_grounding(&self, query: String) -> FacadeResult<GroundingReport>;
    fn bridge_translate(&self, request: TranslationRequest) -> FacadeResult<TranslationReport>;
    fn bridge_health(&self) -> FacadeResult<BridgeHealth>;

    // ---- cloud sync ----
    fn sync_read_rows(&self, request: SyncReadRequest) -> FacadeResult<SyncRows>;
    fn sync_max_cursor(&self, table: String) -> FacadeResult<SyncCursor>;
}
