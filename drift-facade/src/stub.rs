//! The stub façade: every operation returns a structurally valid empty
//! default and never errors.
//!
//! It is the fallback when no native backend is present, and the fixture
//! adapters test against — a new adapter that works against the stub works
//! against the engine.

use drift_analysis::gates::{GateStatus, QualityGateResult, RunMetadata};
use drift_analysis::scorers::{ImpactMetrics, SecurityMetrics};
use drift_analysis::speculation::{
    ApproachScores, ApproachStrategy, ScoredApproach, SimulationApproach, SimulationResult,
    SimulationTask,
};
use drift_core::types::{Pattern, PatternSummary, Violation};
use drift_storage::backup::BackupMetadata;
use drift_storage::repository::{QueryOptions, QueryResult};

use crate::types::*;
use crate::{DriftFacade, FacadeResult};

/// Backend-free implementation with valid empty defaults.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubFacade;

impl StubFacade {
    pub fn new() -> Self {
        Self
    }
}

impl DriftFacade for StubFacade {
    fn initialize(&self, options: InitializeOptions) -> FacadeResult<InitializeStatus> {
        Ok(InitializeStatus {
            initialized: true,
            workspace_root: options.project_root.unwrap_or_default(),
            schema_version: drift_storage::workspace::SCHEMA_VERSION,
            pattern_count: 0,
        })
    }

    fn shutdown(&self) -> FacadeResult<ShutdownStatus> {
        Ok(ShutdownStatus {
            flushed: true,
            duration_ms: 0,
        })
    }

    fn gc(&self) -> FacadeResult<GcStatus> {
        Ok(GcStatus::default())
    }

    fn setup_status(&self) -> FacadeResult<SetupStatus> {
        Ok(SetupStatus::default())
    }

    fn workspace_status(&self) -> FacadeResult<WorkspaceStatus> {
        Ok(WorkspaceStatus {
            callgraph_stats: CallGraphStatus {
                resolution_rate: 1.0,
                ..Default::default()
            },
            ..Default::default()
        })
    }

    fn scan(&self, _options: ScanOptions) -> FacadeResult<ScanStatus> {
        Ok(ScanStatus::default())
    }

    fn analyze(&self, _options: AnalyzeOptions) -> FacadeResult<AnalyzeStatus> {
        Ok(AnalyzeStatus::default())
    }

    fn list_patterns(&self, _query: QueryOptions) -> FacadeResult<QueryResult> {
        Ok(QueryResult {
            patterns: Vec::new(),
            total: 0,
            has_more: false,
        })
    }

    fn get_pattern(&self, _id: String) -> FacadeResult<Option<Pattern>> {
        Ok(None)
    }

    fn get_pattern_summaries(&self) -> FacadeResult<Vec<PatternSummary>> {
        Ok(Vec::new())
    }

    fn approve_pattern(&self, id: String, by: Option<String>) -> FacadeResult<Pattern> {
        // A synthetic approved record keeps the envelope complete.
        let mut pattern = Pattern::discovered(
            id,
            "structural",
            "stub pattern",
            "structural/stub",
            drift_core::types::DetectionMethod::Custom,
            1.0,
        );
        pattern.status = drift_core::types::PatternStatus::Approved;
        pattern.approved_at = Some(chrono::Utc::now());
        pattern.approved_by = by;
        Ok(pattern)
    }

    fn ignore_pattern(&self, id: String) -> FacadeResult<Pattern> {
        let mut pattern = Pattern::discovered(
            id,
            "structural",
            "stub pattern",
            "structural/stub",
            drift_core::types::DetectionMethod::Custom,
            1.0,
        );
        pattern.status = drift_core::types::PatternStatus::Ignored;
        Ok(pattern)
    }

    fn revert_pattern(&self, id: String) -> FacadeResult<Pattern> {
        Ok(Pattern::discovered(
            id,
            "structural",
            "stub pattern",
            "structural/stub",
            drift_core::types::DetectionMethod::Custom,
            1.0,
        ))
    }

    fn delete_pattern(&self, _id: String) -> FacadeResult<bool> {
        Ok(false)
    }

    fn get_confidence(&self, pattern_id: String) -> FacadeResult<ConfidenceReport> {
        Ok(ConfidenceReport {
            pattern_id,
            confidence: 0.5,
            confidence_level: "medium".to_string(),
            interval_low: 0.0,
            interval_high: 1.0,
            evidence_locations: 0,
            evidence_outliers: 0,
        })
    }

    fn list_outliers(&self, _pattern_id: Option<String>) -> FacadeResult<OutlierReport> {
        Ok(OutlierReport::default())
    }

    fn list_conventions(&self) -> FacadeResult<ConventionReport> {
        Ok(ConventionReport::default())
    }

    fn reachability(&self, _query: ReachabilityRequest) -> FacadeResult<ReachabilityReport> {
        Ok(ReachabilityReport::default())
    }

    fn taint_analysis(&self, _options: AnalysisScope) -> FacadeResult<TaintReport> {
        Ok(TaintReport::default())
    }

    fn error_handling_analysis(
        &self,
        _options: AnalysisScope,
    ) -> FacadeResult<ErrorHandlingReport> {
        Ok(ErrorHandlingReport {
            gaps: Vec::new(),
            handled_ratio: 1.0,
        })
    }

    fn impact_analysis(&self, changed_files: Vec<String>) -> FacadeResult<ImpactMetrics> {
        Ok(drift_analysis::scorers::ImpactScorer::default().estimate_without_graph(&changed_files))
    }

    fn security_analysis(&self, _target_files: Vec<String>) -> FacadeResult<SecurityMetrics> {
        Ok(SecurityMetrics::default())
    }

    fn test_topology_analysis(&self, _options: AnalysisScope) -> FacadeResult<TestTopologyReport> {
        Ok(TestTopologyReport::default())
    }

    fn coupling_analysis(&self, _options: AnalysisScope) -> FacadeResult<CouplingReport> {
        Ok(CouplingReport::default())
    }

    fn constraint_analysis(&self, _options: AnalysisScope) -> FacadeResult<ConstraintReport> {
        Ok(ConstraintReport::default())
    }

    fn contract_analysis(&self, _options: AnalysisScope) -> FacadeResult<ContractReport> {
        Ok(ContractReport::default())
    }

    fn constants_analysis(&self, _options: AnalysisScope) -> FacadeResult<ConstantsReport> {
        Ok(ConstantsReport::default())
    }

    fn wrapper_analysis(&self, _options: AnalysisScope) -> FacadeResult<WrapperReport> {
        Ok(WrapperReport::default())
    }

    fn dna_analysis(&self, _options: AnalysisScope) -> FacadeResult<DnaReport> {
        Ok(DnaReport {
            genes: Vec::new(),
            health_score: 100.0,
        })
    }

    fn owasp_analysis(&self, _options: AnalysisScope) -> FacadeResult<OwaspReport> {
        Ok(OwaspReport::default())
    }

    fn crypto_analysis(&self, _options: AnalysisScope) -> FacadeResult<CryptoReport> {
        Ok(CryptoReport::default())
    }

    fn decomposition_analysis(
        &self,
        _options: AnalysisScope,
    ) -> FacadeResult<DecompositionReport> {
        Ok(DecompositionReport::default())
    }

    fn gate_check(&self, _options: GateCheckOptions) -> FacadeResult<QualityGateResult> {
        Ok(QualityGateResult {
            status: GateStatus::Passed,
            passed: true,
            score: 100.0,
            gates: Vec::new(),
            violations: Vec::new(),
            warnings: Vec::new(),
            metadata: RunMetadata::default(),
        })
    }

    fn audit(&self, _options: AuditOptions) -> FacadeResult<AuditReport> {
        Ok(AuditReport::default())
    }

    fn list_violations(&self, _options: ViolationQuery) -> FacadeResult<Vec<Violation>> {
        Ok(Vec::new())
    }

    fn gate_report(&self, _options: GateCheckOptions) -> FacadeResult<GateReport> {
        Ok(GateReport::default())
    }

    fn dismiss_violation(
        &self,
        id: String,
        _reason: Option<String>,
    ) -> FacadeResult<FeedbackStatus> {
        Ok(FeedbackStatus {
            violation_id: id,
            acknowledged: true,
        })
    }

    fn mark_violation_fixed(&self, id: String) -> FacadeResult<FeedbackStatus> {
        Ok(FeedbackStatus {
            violation_id: id,
            acknowledged: true,
        })
    }

    fn suppress_violation(
        &self,
        id: String,
        _until: Option<String>,
    ) -> FacadeResult<FeedbackStatus> {
        Ok(FeedbackStatus {
            violation_id: id,
            acknowledged: true,
        })
    }

    fn simulate(&self, task: SimulationTask) -> FacadeResult<SimulationResult> {
        // The non-empty guarantee holds even in the stub.
        let approach = SimulationApproach {
            name: "Generic Implementation".to_string(),
            description: format!("Implement '{}' directly", task.description),
            strategy: ApproachStrategy::Custom,
            language: None,
            target_files: Vec::new(),
            new_files: Vec::new(),
            estimated_lines: 0,
        };
        Ok(SimulationResult {
            task,
            approaches: vec![ScoredApproach {
                approach,
                scores: ApproachScores {
                    friction: 50.0,
                    impact: 50.0,
                    pattern_alignment: 50.0,
                    security: 50.0,
                    composite: 50.0,
                },
                rank: 1,
            }],
            tradeoffs: Vec::new(),
            confidence: 0.5,
            limitations: vec![
                "No call graph available; impact and security are estimated".to_string(),
                "No patterns available; alignment scored neutrally".to_string(),
            ],
        })
    }

    fn mine_decisions(&self, _options: AnalysisScope) -> FacadeResult<DecisionReport> {
        Ok(DecisionReport::default())
    }

    fn generate_context(&self, _options: ContextOptions) -> FacadeResult<ContextPack> {
        Ok(ContextPack::default())
    }

    fn generate_spec(&self, _options: SpecOptions) -> FacadeResult<SpecPack> {
        Ok(SpecPack::default())
    }

    fn capture_snapshot(
        &self,
        branch: String,
        commit_sha: Option<String>,
    ) -> FacadeResult<SnapshotStatus> {
        Ok(SnapshotStatus {
            branch,
            commit_sha,
            timestamp: Some(chrono::Utc::now()),
            pattern_count: 0,
        })
    }

    fn list_snapshots(&self) -> FacadeResult<Vec<SnapshotStatus>> {
        Ok(Vec::new())
    }

    fn create_backup(&self, _reason: String) -> FacadeResult<BackupStatus> {
        Ok(BackupStatus::default())
    }

    fn list_backups(&self) -> FacadeResult<Vec<BackupMetadata>> {
        Ok(Vec::new())
    }

    fn restore_backup(&self, id: String) -> FacadeResult<BackupStatus> {
        Ok(BackupStatus {
            id,
            ..Default::default()
        })
    }

    fn delete_backup(&self, _id: String, _confirm: String) -> FacadeResult<bool> {
        Ok(false)
    }

    fn bridge_status(&self) -> FacadeResult<BridgeStatus> {
        Ok(BridgeStatus::default())
    }

    fn bridge_grounding(&self, query: String) -> FacadeResult<GroundingReport> {
        Ok(GroundingReport {
            query,
            grounded: Vec::new(),
        })
    }

    fn bridge_translate(&self, request: TranslationRequest) -> FacadeResult<TranslationReport> {
        Ok(TranslationReport {
            translated: request.text,
            unmapped_terms: Vec::new(),
        })
    }

    fn bridge_health(&self) -> FacadeResult<BridgeHealth> {
        Ok(BridgeHealth {
            healthy: true,
            checks: Vec::new(),
        })
    }

    fn sync_read_rows(&self, request: SyncReadRequest) -> FacadeResult<SyncRows> {
        Ok(SyncRows {
            table: request.table,
            rows: Vec::new(),
            next_cursor: None,
        })
    }

    fn sync_max_cursor(&self, table: String) -> FacadeResult<SyncCursor> {
        Ok(SyncCursor {
            table,
            max_cursor: None,
        })
    }
}
