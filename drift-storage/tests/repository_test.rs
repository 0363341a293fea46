//! Pattern repository integration tests: lifecycle, status machine,
//! querying, persistence round trips, and events.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use drift_core::errors::PatternError;
use drift_core::events::PatternEvent;
use drift_core::types::{
    ConfidenceLevel, DetectionMethod, Location, Pattern, PatternStatus, Severity,
};
use drift_storage::repository::{
    Pagination, PatternFilter, PatternPatch, PatternRepository, QueryOptions, Sort, SortDirection,
    SortField,
};
use drift_storage::workspace::Workspace;

fn repo(dir: &tempfile::TempDir) -> PatternRepository {
    let repo = PatternRepository::new(Workspace::at(dir.path()));
    repo.initialize().unwrap();
    repo
}

fn pattern(id: &str, category: &str, confidence: f64) -> Pattern {
    let mut p = Pattern::discovered(
        id,
        category,
        format!("{id} name"),
        format!("{category}/slug"),
        DetectionMethod::Structural,
        confidence,
    );
    p.locations.push(Location::new("src/a.ts", 10));
    p
}

/// Seed scenario: approve then re-query by status.
#[test]
fn approve_then_requery() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo(&dir);
    repo.add(pattern("p1", "structural", 0.85)).unwrap();

    repo.approve("p1", Some("alice")).unwrap();

    let result = repo
        .query(&QueryOptions {
            filter: PatternFilter {
                statuses: vec![PatternStatus::Approved],
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap();

    assert_eq!(result.total, 1);
    let p = &result.patterns[0];
    assert_eq!(p.status, PatternStatus::Approved);
    assert_eq!(p.approved_by.as_deref(), Some("alice"));
    assert!(p.approved_at.is_some());
    assert_eq!(p.confidence_level, ConfidenceLevel::High);
}

/// The status machine: ignored rejects approve; revert makes it legal again.
#[test]
fn status_machine_transitions() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo(&dir);
    repo.add(pattern("p1", "errors", 0.6)).unwrap();

    repo.ignore("p1").unwrap();
    let denied = repo.approve("p1", Some("bob"));
    assert!(matches!(
        denied,
        Err(PatternError::InvalidStatusTransition { .. })
    ));

    repo.revert("p1").unwrap();
    let approved = repo.approve("p1", Some("bob")).unwrap();
    assert_eq!(approved.status, PatternStatus::Approved);
    assert!(approved.invariants_hold());
}

/// Approving an approved pattern is an idempotent no-op, with no event.
#[test]
fn approve_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo(&dir);
    repo.add(pattern("p1", "api", 0.9)).unwrap();

    let approvals = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&approvals);
    repo.on(move |e| {
        if matches!(e, PatternEvent::Approved(_)) {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    let first = repo.approve("p1", Some("alice")).unwrap();
    let second = repo.approve("p1", Some("mallory")).unwrap();

    assert_eq!(approvals.load(Ordering::SeqCst), 1);
    assert_eq!(second.approved_by, first.approved_by);
    assert_eq!(second.metadata.version, first.metadata.version);
}

/// Confidence bucket stays consistent through updates.
#[test]
fn update_recomputes_confidence_level() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo(&dir);
    repo.add(pattern("p1", "style", 0.4)).unwrap();

    let updated = repo
        .update(
            "p1",
            PatternPatch {
                confidence: Some(0.95),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.confidence_level, ConfidenceLevel::VeryHigh);
    assert_eq!(updated.metadata.version, 1);
}

/// delete → get is None; a second delete returns false without error.
#[test]
fn delete_twice() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo(&dir);
    repo.add(pattern("p1", "config", 0.7)).unwrap();

    assert!(repo.delete("p1").unwrap());
    assert!(repo.get("p1").unwrap().is_none());
    assert!(!repo.delete("p1").unwrap());
}

/// Paginating with {offset: 0, limit: total} equals the unpaginated query.
#[test]
fn pagination_equivalence() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo(&dir);
    for i in 0..17 {
        repo.add(pattern(&format!("p{i:02}"), "structural", 0.3 + (i as f64) * 0.04))
            .unwrap();
    }

    let sort = Some(Sort {
        field: SortField::Confidence,
        direction: SortDirection::Desc,
    });
    let unpaginated = repo
        .query(&QueryOptions {
            sort,
            ..Default::default()
        })
        .unwrap();
    let paginated = repo
        .query(&QueryOptions {
            sort,
            pagination: Some(Pagination {
                offset: 0,
                limit: unpaginated.total,
            }),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(unpaginated.total, paginated.total);
    assert!(!paginated.has_more);
    let ids_a: Vec<&str> = unpaginated.patterns.iter().map(|p| p.id.as_str()).collect();
    let ids_b: Vec<&str> = paginated.patterns.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids_a, ids_b);

    // Chunked pages concatenate to the same order.
    let mut chunked = Vec::new();
    let mut offset = 0;
    loop {
        let page = repo
            .query(&QueryOptions {
                sort,
                pagination: Some(Pagination { offset, limit: 5 }),
                ..Default::default()
            })
            .unwrap();
        let done = !page.has_more;
        chunked.extend(page.patterns.into_iter().map(|p| p.id));
        if done {
            break;
        }
        offset += 5;
    }
    assert_eq!(chunked.len(), ids_a.len());
    assert!(chunked.iter().map(String::as_str).eq(ids_a.iter().copied()));
}

/// Filter combinations: confidence range, search, files, outlier flag.
#[test]
fn query_filters() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo(&dir);
    let mut with_outlier = pattern("p1", "security", 0.92);
    with_outlier.outliers.push(drift_core::types::Outlier {
        location: Location::new("src/odd.ts", 3),
        reason: "deviates".to_string(),
        deviation_score: 0.7,
    });
    with_outlier.description = "JWT session handling".to_string();
    repo.add(with_outlier).unwrap();
    repo.add(pattern("p2", "errors", 0.55)).unwrap();

    let high = repo
        .query(&QueryOptions {
            filter: PatternFilter {
                min_confidence: Some(0.9),
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap();
    assert_eq!(high.total, 1);
    assert_eq!(high.patterns[0].id, "p1");

    let searched = repo
        .query(&QueryOptions {
            filter: PatternFilter {
                search: Some("jwt".to_string()),
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap();
    assert_eq!(searched.total, 1);

    let outliers = repo
        .query(&QueryOptions {
            filter: PatternFilter {
                has_outliers: Some(true),
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap();
    assert_eq!(outliers.total, 1);

    let by_file = repo.get_by_file("src/a.ts").unwrap();
    assert_eq!(by_file.len(), 2);
}

/// save_all → fresh repository → load yields the same multiset of
/// (id, status, confidence, level, locations, outliers, severity, tags).
#[test]
fn save_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo(&dir);
    repo.add(pattern("p1", "structural", 0.85)).unwrap();
    repo.add(pattern("p2", "security", 0.95)).unwrap();
    repo.add(pattern("p3", "errors", 0.45)).unwrap();
    repo.approve("p1", Some("alice")).unwrap();
    repo.ignore("p3").unwrap();
    repo.save_all().unwrap();

    let reloaded = PatternRepository::new(Workspace::at(dir.path()));
    reloaded.initialize().unwrap();

    let key = |p: &Pattern| {
        (
            p.id.clone(),
            p.status,
            (p.confidence * 1e9) as i64,
            p.confidence_level,
            p.locations.len(),
            p.outliers.len(),
            p.severity,
            p.tags.clone(),
        )
    };
    let mut before: Vec<_> = repo.get_all().unwrap().iter().map(key).collect();
    let mut after: Vec<_> = reloaded.get_all().unwrap().iter().map(key).collect();
    before.sort();
    after.sort();
    assert_eq!(before, after);

    // Status directories hold what they claim.
    let ws = Workspace::at(dir.path());
    assert!(ws.patterns_dir("approved").join("p1.json").exists());
    assert!(ws.patterns_dir("ignored").join("p3.json").exists());
    assert!(ws.patterns_dir("discovered").join("p2.json").exists());
}

/// Moving a pattern across statuses prunes the stale file on save.
#[test]
fn save_prunes_moved_patterns() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo(&dir);
    repo.add(pattern("p1", "structural", 0.8)).unwrap();
    repo.save_all().unwrap();

    let ws = Workspace::at(dir.path());
    assert!(ws.patterns_dir("discovered").join("p1.json").exists());

    repo.approve("p1", None).unwrap();
    repo.save_all().unwrap();
    assert!(!ws.patterns_dir("discovered").join("p1.json").exists());
    assert!(ws.patterns_dir("approved").join("p1.json").exists());
}

/// A corrupt pattern file is skipped on load, not fatal.
#[test]
fn tolerant_load_skips_corrupt_files() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo(&dir);
    repo.add(pattern("p1", "structural", 0.8)).unwrap();
    repo.save_all().unwrap();

    let ws = Workspace::at(dir.path());
    std::fs::write(ws.patterns_dir("discovered").join("junk.json"), b"{not json").unwrap();

    let reloaded = PatternRepository::new(Workspace::at(dir.path()));
    reloaded.initialize().unwrap();
    assert_eq!(reloaded.count(None).unwrap(), 1);
}

/// Operations before initialize fail with NotInitialized.
#[test]
fn not_initialized_guard() {
    let dir = tempfile::tempdir().unwrap();
    let repo = PatternRepository::new(Workspace::at(dir.path()));
    assert!(matches!(
        repo.get("p1"),
        Err(PatternError::NotInitialized)
    ));
    assert!(matches!(
        repo.add(pattern("p1", "api", 0.5)),
        Err(PatternError::NotInitialized)
    ));
}

/// Events fire per mutation, in order, with add_many emitting per item.
#[test]
fn event_stream() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo(&dir);

    let log: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let token = repo.on(move |e| sink.lock().unwrap().push(e.name().to_string()));

    repo.add_many(vec![
        pattern("p1", "api", 0.8),
        pattern("p2", "api", 0.9),
    ])
    .unwrap();
    repo.approve("p1", None).unwrap();
    repo.delete("p2").unwrap();
    repo.save_all().unwrap();

    let events = log.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            "pattern:added",
            "pattern:added",
            "pattern:approved",
            "pattern:deleted",
            "patterns:saved",
        ]
    );

    assert!(repo.off(token));
    repo.add(pattern("p3", "api", 0.5)).unwrap();
    assert_eq!(log.lock().unwrap().len(), 5);
}

/// Duplicate adds are rejected.
#[test]
fn duplicate_add_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo(&dir);
    repo.add(pattern("p1", "api", 0.5)).unwrap();
    assert!(matches!(
        repo.add(pattern("p1", "api", 0.6)),
        Err(PatternError::PatternAlreadyExists { .. })
    ));
}

/// Severity ordering is usable in sorts.
#[test]
fn severity_sort() {
    let dir = tempfile::tempdir().unwrap();
    let repo = repo(&dir);
    let mut a = pattern("pa", "errors", 0.5);
    a.severity = Severity::Error;
    let mut b = pattern("pb", "errors", 0.5);
    b.severity = Severity::Hint;
    repo.add(a).unwrap();
    repo.add(b).unwrap();

    let result = repo
        .query(&QueryOptions {
            sort: Some(Sort {
                field: SortField::Severity,
                direction: SortDirection::Desc,
            }),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(result.patterns[0].id, "pa");
}
