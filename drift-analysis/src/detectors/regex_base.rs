//! Regex detection base — line- and file-oriented matching with
//! comment skipping, shared by every `detection_method = regex` detector.

use regex::Regex;
use rustc_hash::FxHashSet;

use drift_core::types::{Location, Violation, ViolationSeverity};

/// Internal record a regex detector produces per match before conversion.
#[derive(Debug, Clone)]
pub struct RegexFinding {
    pub value: String,
    pub issue: String,
    pub suggested_fix: Option<String>,
    pub severity: ViolationSeverity,
    pub line: u32,
}

/// A single line match: 1-based line number plus the matched text.
#[derive(Debug, Clone, PartialEq)]
pub struct LineMatch {
    pub line: u32,
    pub column: u32,
    pub text: String,
}

/// Comment syntax per language family.
fn line_comment_prefixes(language: &str) -> &'static [&'static str] {
    match language {
        "python" | "ruby" | "shell" => &["#"],
        "php" => &["//", "#"],
        _ => &["//"],
    }
}

/// True when the trimmed line is a comment for `language`.
///
/// Block comments are approximated by their opening token; the regex base is
/// line-oriented and does not track multi-line comment state.
pub fn is_comment_line(line: &str, language: &str) -> bool {
    let trimmed = line.trim_start();
    let block_comment = trimmed.starts_with("/*")
        || trimmed.starts_with("*/")
        || trimmed.starts_with("* ")
        || trimmed == "*";
    if block_comment && language != "python" {
        return true;
    }
    line_comment_prefixes(language)
        .iter()
        .any(|p| trimmed.starts_with(p))
}

/// Match `pattern` against each line, skipping comments when asked.
pub fn match_lines(
    content: &str,
    pattern: &Regex,
    language: &str,
    skip_comments: bool,
) -> Vec<LineMatch> {
    let mut matches = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if skip_comments && is_comment_line(line, language) {
            continue;
        }
        for m in pattern.find_iter(line) {
            matches.push(LineMatch {
                line: idx as u32 + 1,
                column: m.start() as u32,
                text: m.as_str().to_string(),
            });
        }
    }
    matches
}

/// Match `pattern` against the whole file, mapping byte offsets to lines.
pub fn match_file(content: &str, pattern: &Regex) -> Vec<LineMatch> {
    let mut line_starts = vec![0usize];
    for (i, b) in content.bytes().enumerate() {
        if b == b'\n' {
            line_starts.push(i + 1);
        }
    }
    pattern
        .find_iter(content)
        .map(|m| {
            let line_idx = match line_starts.binary_search(&m.start()) {
                Ok(i) => i,
                Err(i) => i - 1,
            };
            LineMatch {
                line: line_idx as u32 + 1,
                column: (m.start() - line_starts[line_idx]) as u32,
                text: m.as_str().to_string(),
            }
        })
        .collect()
}

/// Convert matches to instance locations.
pub fn matches_to_locations(file: &str, matches: &[LineMatch]) -> Vec<Location> {
    matches
        .iter()
        .map(|m| {
            let mut loc = Location::new(file, m.line);
            loc.column = Some(m.column);
            loc
        })
        .collect()
}

/// Convert findings into canonical violations, deduplicated by `(file, line)`.
pub fn findings_to_violations(
    file: &str,
    category: &str,
    pattern_id: &str,
    findings: &[RegexFinding],
) -> Vec<Violation> {
    let mut seen: FxHashSet<(String, u32)> = FxHashSet::default();
    let mut violations = Vec::new();
    for finding in findings {
        if !seen.insert((file.to_string(), finding.line)) {
            continue;
        }
        let mut v = Violation::new(
            format!("{pattern_id}:{file}:{}", finding.line),
            file,
            finding.line,
            pattern_id,
            finding.severity,
        );
        v.category = category.to_string();
        v.expected = finding.issue.clone();
        v.actual = finding.value.clone();
        v.suggested_fix = finding.suggested_fix.clone();
        v.auto_fixable = finding.suggested_fix.is_some();
        violations.push(v);
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_matching_skips_comments() {
        let re = Regex::new(r"password").unwrap();
        let content = "// password here\nlet password = x;\n# password\n";
        let ts = match_lines(content, &re, "typescript", true);
        assert_eq!(ts.len(), 2); // `#` is not a ts comment
        assert_eq!(ts[0].line, 2);

        let py = match_lines(content, &re, "python", true);
        assert_eq!(py.len(), 2); // `//` is not a python comment prefix
    }

    #[test]
    fn file_matching_maps_lines() {
        let re = Regex::new(r"TODO").unwrap();
        let content = "a\nb TODO\nccc\nTODO";
        let ms = match_file(content, &re);
        assert_eq!(ms.len(), 2);
        assert_eq!(ms[0].line, 2);
        assert_eq!(ms[0].column, 2);
        assert_eq!(ms[1].line, 4);
    }

    #[test]
    fn violations_dedupe_by_location() {
        let findings = vec![
            RegexFinding {
                value: "a".into(),
                issue: "x".into(),
                suggested_fix: None,
                severity: ViolationSeverity::Warning,
                line: 3,
            },
            RegexFinding {
                value: "b".into(),
                issue: "x".into(),
                suggested_fix: None,
                severity: ViolationSeverity::Warning,
                line: 3,
            },
        ];
        let vs = findings_to_violations("src/a.ts", "security", "security/hardcoded", &findings);
        assert_eq!(vs.len(), 1);
        assert_eq!(vs[0].line, 3);
    }
}
