//! Violations — concrete deviations a gate or detector reports.

use serde::{Deserialize, Serialize};

use super::enums::ViolationSeverity;

/// A machine-applicable fix suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fix {
    pub description: String,
    pub replacement: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<(u32, u32)>,
}

/// A single violation of a pattern or rule at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub id: String,
    pub file: String,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    pub category: String,
    pub pattern_id: String,
    /// What the pattern expects at this site.
    pub expected: String,
    /// What the code actually does.
    pub actual: String,
    pub severity: ViolationSeverity,
    pub confidence: f64,
    pub auto_fixable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
}

impl Violation {
    pub fn new(
        id: impl Into<String>,
        file: impl Into<String>,
        line: u32,
        pattern_id: impl Into<String>,
        severity: ViolationSeverity,
    ) -> Self {
        Self {
            id: id.into(),
            file: file.into(),
            line,
            end_line: None,
            category: String::new(),
            pattern_id: pattern_id.into(),
            expected: String::new(),
            actual: String::new(),
            severity,
            confidence: 1.0,
            auto_fixable: false,
            suggested_fix: None,
            code_snippet: None,
        }
    }

    /// Deterministic ordering key: `(file, line, pattern_id)`.
    pub fn sort_key(&self) -> (&str, u32, &str) {
        (&self.file, self.line, &self.pattern_id)
    }
}
