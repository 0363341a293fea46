//! Pattern query planner: filter → sort → paginate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use drift_core::types::{ConfidenceLevel, Pattern, PatternStatus, Severity};

/// Conjunctive filter; empty/None fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatternFilter {
    pub ids: Vec<String>,
    pub categories: Vec<String>,
    pub statuses: Vec<PatternStatus>,
    pub min_confidence: Option<f64>,
    pub max_confidence: Option<f64>,
    pub confidence_levels: Vec<ConfidenceLevel>,
    pub severities: Vec<Severity>,
    /// Matches patterns with at least one location in any of these files.
    pub files: Vec<String>,
    pub has_outliers: Option<bool>,
    /// Matches patterns carrying any of these tags.
    pub tags: Vec<String>,
    /// Case-insensitive substring over name and description.
    pub search: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

impl PatternFilter {
    pub fn matches(&self, p: &Pattern) -> bool {
        if !self.ids.is_empty() && !self.ids.contains(&p.id) {
            return false;
        }
        if !self.categories.is_empty() && !self.categories.contains(&p.category) {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&p.status) {
            return false;
        }
        if let Some(min) = self.min_confidence {
            if p.confidence < min {
                return false;
            }
        }
        if let Some(max) = self.max_confidence {
            if p.confidence > max {
                return false;
            }
        }
        if !self.confidence_levels.is_empty() && !self.confidence_levels.contains(&p.confidence_level)
        {
            return false;
        }
        if !self.severities.is_empty() && !self.severities.contains(&p.severity) {
            return false;
        }
        if !self.files.is_empty()
            && !p.locations.iter().any(|l| self.files.contains(&l.file))
        {
            return false;
        }
        if let Some(has_outliers) = self.has_outliers {
            if p.outliers.is_empty() == has_outliers {
                return false;
            }
        }
        if !self.tags.is_empty() && !p.tags.iter().any(|t| self.tags.contains(t)) {
            return false;
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !p.name.to_lowercase().contains(&needle)
                && !p.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if let Some(after) = self.created_after {
            if p.first_seen < after {
                return false;
            }
        }
        if let Some(before) = self.created_before {
            if p.first_seen > before {
                return false;
            }
        }
        true
    }
}

/// Sortable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    Confidence,
    Severity,
    FirstSeen,
    LastSeen,
    LocationCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub offset: usize,
    pub limit: usize,
}

/// Full query: any combination of filter, sort, and pagination.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryOptions {
    pub filter: PatternFilter,
    pub sort: Option<Sort>,
    pub pagination: Option<Pagination>,
}

/// Query outcome. `total` is the pre-pagination match count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub patterns: Vec<Pattern>,
    pub total: usize,
    pub has_more: bool,
}

/// Run a query over an in-memory snapshot. Results are id-ordered before
/// any explicit sort so identical queries return identical output.
pub fn run_query(patterns: &[Pattern], opts: &QueryOptions) -> QueryResult {
    let mut matched: Vec<Pattern> = patterns
        .iter()
        .filter(|p| opts.filter.matches(p))
        .cloned()
        .collect();
    matched.sort_by(|a, b| a.id.cmp(&b.id));

    if let Some(sort) = opts.sort {
        matched.sort_by(|a, b| {
            let ordering = match sort.field {
                SortField::Name => a.name.cmp(&b.name),
                SortField::Confidence => a
                    .confidence
                    .partial_cmp(&b.confidence)
                    .unwrap_or(std::cmp::Ordering::Equal),
                SortField::Severity => a.severity.cmp(&b.severity),
                SortField::FirstSeen => a.first_seen.cmp(&b.first_seen),
                SortField::LastSeen => a.last_seen.cmp(&b.last_seen),
                SortField::LocationCount => a.locations.len().cmp(&b.locations.len()),
            };
            let ordering = ordering.then_with(|| a.id.cmp(&b.id));
            match sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    let total = matched.len();
    let (patterns, has_more) = match opts.pagination {
        Some(page) => {
            let end = page.offset.saturating_add(page.limit).min(total);
            let start = page.offset.min(total);
            let has_more = end < total;
            (matched[start..end].to_vec(), has_more)
        }
        None => (matched, false),
    };

    QueryResult {
        patterns,
        total,
        has_more,
    }
}
