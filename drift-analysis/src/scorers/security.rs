//! Security scoring — lexical sensitivity classification plus weighted
//! risk accumulation over reachable data accesses.

use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};

use drift_core::types::Sensitivity;

use crate::call_graph::{CallGraph, DataOperation};
use crate::reachability::{ReachabilityEngine, ReachabilityQuery};

const CREDENTIAL_TERMS: &[&str] = &[
    "password",
    "secret",
    "token",
    "api_key",
    "private_key",
    "auth_token",
    "refresh_token",
];

const FINANCIAL_TERMS: &[&str] = &[
    "credit_card",
    "card_number",
    "payment",
    "billing",
    "salary",
    "invoice",
    "iban",
    "account_number",
];

const HEALTH_TERMS: &[&str] = &[
    "diagnosis",
    "medical",
    "patient",
    "prescription",
    "hipaa",
    "treatment",
];

const PII_TERMS: &[&str] = &["ssn", "email", "phone", "address", "dob", "user"];

const AUTH_NAME_TERMS: &[&str] = &[
    "auth",
    "login",
    "permission",
    "verifytoken",
    "verify_token",
    "authorize",
    "authenticate",
];

/// Classify a table or field name by vocabulary, most sensitive class first.
pub fn classify_sensitivity(text: &str) -> Sensitivity {
    let lower = text.to_ascii_lowercase();
    let matcher = |terms: &[&str]| {
        AhoCorasick::new(terms)
            .map(|ac| ac.is_match(&lower))
            .unwrap_or(false)
    };
    if matcher(CREDENTIAL_TERMS) {
        Sensitivity::Credentials
    } else if matcher(FINANCIAL_TERMS) {
        Sensitivity::Financial
    } else if matcher(HEALTH_TERMS) {
        Sensitivity::Health
    } else if matcher(PII_TERMS) {
        Sensitivity::Pii
    } else {
        Sensitivity::Unknown
    }
}

/// Warning categories with their fixed severities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    CredentialAccess,
    FinancialData,
    HealthData,
    PiiAccess,
    AuthModification,
    DistributedSecurity,
    DataModification,
}

impl WarningKind {
    pub fn severity(&self) -> &'static str {
        match self {
            Self::CredentialAccess => "critical",
            Self::FinancialData | Self::HealthData | Self::AuthModification => "high",
            Self::PiiAccess | Self::DistributedSecurity | Self::DataModification => "medium",
        }
    }
}

/// One security warning on the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityWarning {
    pub kind: WarningKind,
    pub severity: String,
    pub message: String,
}

impl SecurityWarning {
    fn new(kind: WarningKind, message: String) -> Self {
        Self {
            kind,
            severity: kind.severity().to_string(),
            message,
        }
    }
}

/// Security metrics for a set of target files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityMetrics {
    /// Accumulated weighted risk, clamped to 100.
    pub security_risk: f64,
    pub warnings: Vec<SecurityWarning>,
    /// Tables reached, with their classification.
    pub tables_touched: Vec<(String, Sensitivity)>,
}

/// Scores the security exposure of touching a set of files.
pub struct SecurityScorer {
    max_depth: u32,
}

impl SecurityScorer {
    pub fn new(max_depth: u32) -> Self {
        Self { max_depth }
    }

    /// Forward-reach from every function in every target file and weigh the
    /// sensitive data encountered. Never fails: an unknown file simply
    /// contributes nothing.
    pub fn score(&self, graph: &CallGraph, target_files: &[String]) -> SecurityMetrics {
        let mut metrics = SecurityMetrics::default();
        let mut risk = 0.0f64;
        let mut tables: Vec<(String, Sensitivity)> = Vec::new();
        let mut auth_touched = 0usize;
        let mut writes = 0usize;

        let starts: Vec<String> = target_files
            .iter()
            .flat_map(|f| graph.functions_in_file(f))
            .map(|n| n.id.clone())
            .collect();

        // Changing a function whose name smells like auth is itself a risk.
        for id in &starts {
            if let Some(node) = graph.function(id) {
                let lower = node.name.to_ascii_lowercase();
                if AUTH_NAME_TERMS.iter().any(|t| lower.contains(t)) {
                    auth_touched += 1;
                }
            }
        }

        let forward = ReachabilityQuery::forward().with_max_depth(self.max_depth);
        for reach in ReachabilityEngine::traverse_many(graph, &starts, &forward) {
            let Some(access) = reach.access else { continue };
            let sensitivity = if access.sensitivity == Sensitivity::Unknown {
                // Producers without classification fall back to lexical.
                let text = format!("{} {}", access.table, access.fields.join(" "));
                classify_sensitivity(&text)
            } else {
                access.sensitivity
            };
            if !tables.iter().any(|(t, _)| *t == access.table) {
                tables.push((access.table.clone(), sensitivity));
                risk += match sensitivity {
                    Sensitivity::Credentials => 25.0,
                    Sensitivity::Financial => 20.0,
                    Sensitivity::Health => 18.0,
                    Sensitivity::Pii => 10.0,
                    Sensitivity::Internal | Sensitivity::Unknown => 0.0,
                };
                match sensitivity {
                    Sensitivity::Credentials => metrics.warnings.push(SecurityWarning::new(
                        WarningKind::CredentialAccess,
                        format!("Reachable access to credential data in table '{}'", access.table),
                    )),
                    Sensitivity::Financial => metrics.warnings.push(SecurityWarning::new(
                        WarningKind::FinancialData,
                        format!("Reachable access to financial data in table '{}'", access.table),
                    )),
                    Sensitivity::Health => metrics.warnings.push(SecurityWarning::new(
                        WarningKind::HealthData,
                        format!("Reachable access to health data in table '{}'", access.table),
                    )),
                    Sensitivity::Pii => metrics.warnings.push(SecurityWarning::new(
                        WarningKind::PiiAccess,
                        format!("Reachable access to PII in table '{}'", access.table),
                    )),
                    _ => {}
                }
            }
            if matches!(access.operation, DataOperation::Write | DataOperation::Delete) {
                writes += 1;
            }
        }

        if auth_touched > 0 {
            risk += auth_touched as f64 * 10.0;
            metrics.warnings.push(SecurityWarning::new(
                WarningKind::AuthModification,
                format!("{auth_touched} auth-related function(s) in the change set"),
            ));
        }
        if writes > 0 && tables.iter().any(|(_, s)| s.is_sensitive()) {
            metrics.warnings.push(SecurityWarning::new(
                WarningKind::DataModification,
                format!("{writes} write/delete operation(s) on reachable tables"),
            ));
        }
        if target_files.len() > 3 && tables.iter().any(|(_, s)| s.is_sensitive()) {
            metrics.warnings.push(SecurityWarning::new(
                WarningKind::DistributedSecurity,
                "Sensitive data reachable from a change spread across many files".to_string(),
            ));
        }

        tables.sort_by(|a, b| a.0.cmp(&b.0));
        metrics.security_risk = risk.min(100.0);
        metrics.tables_touched = tables;
        metrics
    }
}

impl Default for SecurityScorer {
    fn default() -> Self {
        Self::new(ReachabilityQuery::DEFAULT_MAX_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_classification() {
        assert_eq!(classify_sensitivity("user_password"), Sensitivity::Credentials);
        assert_eq!(classify_sensitivity("refresh_token"), Sensitivity::Credentials);
        assert_eq!(classify_sensitivity("billing_address"), Sensitivity::Financial);
        assert_eq!(classify_sensitivity("patient_record"), Sensitivity::Health);
        assert_eq!(classify_sensitivity("email phone"), Sensitivity::Pii);
        assert_eq!(classify_sensitivity("widget_count"), Sensitivity::Unknown);
    }

    #[test]
    fn weights_clamp_at_100() {
        // Five credential tables would be 125 unclamped.
        let mut risk = 0.0f64;
        for _ in 0..5 {
            risk += 25.0;
        }
        assert_eq!(risk.min(100.0), 100.0);
    }
}
