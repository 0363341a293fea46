//! The detector contract.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use drift_core::errors::DetectionError;
use drift_core::types::{DetectionMethod, Fix, Location, Violation};

/// Static detector metadata. `id` follows the `"category/slug"` convention
/// and is unique across the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectorInfo {
    pub id: String,
    pub category: String,
    pub subcategory: String,
    pub name: String,
    pub description: String,
    pub supported_languages: Vec<String>,
    pub detection_method: DetectionMethod,
}

impl DetectorInfo {
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        name: impl Into<String>,
        detection_method: DetectionMethod,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            subcategory: String::new(),
            name: name.into(),
            description: String::new(),
            supported_languages: Vec::new(),
            detection_method,
        }
    }
}

/// Everything a detector sees for one file. `content` is pre-read source
/// text; `language` is the externally detected tag ("typescript", "go", …).
#[derive(Debug, Clone)]
pub struct DetectionContext {
    pub file: String,
    pub language: String,
    pub content: String,
    pub path: Option<PathBuf>,
    /// Previous revision of the file, when the caller has it (diff detectors).
    pub previous_content: Option<String>,
    /// Detector-specific configuration blob.
    pub config: serde_json::Value,
}

impl DetectionContext {
    pub fn new(
        file: impl Into<String>,
        language: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            language: language.into(),
            content: content.into(),
            path: None,
            previous_content: None,
            config: serde_json::Value::Null,
        }
    }
}

/// What a detector produces for one file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub instances: Vec<Location>,
    pub violations: Vec<Violation>,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl DetectionResult {
    /// The canonical empty result: full confidence, nothing found.
    pub fn empty() -> Self {
        Self {
            instances: Vec::new(),
            violations: Vec::new(),
            confidence: 1.0,
            metadata: None,
        }
    }

    /// Reject results that report the reserved invalid location `{file: "", line: 0}`.
    pub fn validate(&self, detector_id: &str) -> Result<(), DetectionError> {
        let bad = self
            .instances
            .iter()
            .find(|l| !l.is_valid())
            .map(|l| format!("{}:{}", l.file, l.line))
            .or_else(|| {
                self.violations
                    .iter()
                    .find(|v| v.file.is_empty() || v.line == 0)
                    .map(|v| format!("{}:{}", v.file, v.line))
            });
        match bad {
            Some(loc) => Err(DetectionError::InvalidLocation {
                id: detector_id.to_string(),
                message: format!("reserved invalid location '{loc}'"),
            }),
            None => Ok(()),
        }
    }
}

/// A unit that inspects one file and emits instances, violations, and a
/// confidence. Implementations must be `Send + Sync` — the runner executes
/// them in parallel across files.
pub trait Detector: Send + Sync {
    fn info(&self) -> &DetectorInfo;

    fn detect(&self, context: &DetectionContext) -> Result<DetectionResult, DetectionError>;

    /// A pure quick-fix suggestion for a violation this detector produced.
    fn quick_fix(&self, _violation: &Violation) -> Option<Fix> {
        None
    }

    /// Language support: explicit list membership, or everything when the
    /// list is empty or contains `"*"`.
    fn supports_language(&self, language: &str) -> bool {
        let langs = &self.info().supported_languages;
        langs.is_empty() || langs.iter().any(|l| l == "*" || l == language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_core::types::ViolationSeverity;

    struct NullDetector(DetectorInfo);
    impl Detector for NullDetector {
        fn info(&self) -> &DetectorInfo {
            &self.0
        }
        fn detect(&self, _: &DetectionContext) -> Result<DetectionResult, DetectionError> {
            Ok(DetectionResult::empty())
        }
    }

    #[test]
    fn empty_result_is_full_confidence() {
        let r = DetectionResult::empty();
        assert_eq!(r.confidence, 1.0);
        assert!(r.instances.is_empty() && r.violations.is_empty());
    }

    #[test]
    fn reserved_location_rejected() {
        let mut r = DetectionResult::empty();
        r.instances.push(Location::new("", 0));
        assert!(r.validate("style/naming").is_err());

        let mut r = DetectionResult::empty();
        r.violations
            .push(Violation::new("v1", "", 0, "p1", ViolationSeverity::Warning));
        assert!(r.validate("style/naming").is_err());
    }

    #[test]
    fn language_support_defaults() {
        let mut info = DetectorInfo::new("style/naming", "style", "Naming", DetectionMethod::Structural);
        let d = NullDetector(info.clone());
        assert!(d.supports_language("go"));

        info.supported_languages = vec!["typescript".into(), "javascript".into()];
        let d = NullDetector(info);
        assert!(d.supports_language("typescript"));
        assert!(!d.supports_language("go"));
    }
}
