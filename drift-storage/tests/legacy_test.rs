//! Legacy adapter tests: conversion fidelity, error translation, and
//! unified event re-emission.

use std::sync::{Arc, Mutex};

use drift_core::errors::PatternError;
use drift_core::events::PatternEvent;
use drift_core::types::{DetectionMethod, Location, Pattern, PatternStatus, Severity};
use drift_storage::legacy::{LegacyPatternStore, LegacyStoreAdapter};

fn sample() -> Pattern {
    let mut p = Pattern::discovered(
        "p1",
        "security",
        "JWT validation",
        "security/jwt",
        DetectionMethod::Semantic,
        0.88,
    );
    p.subcategory = "auth".to_string();
    p.description = "Tokens validated before use".to_string();
    p.severity = Severity::Warning;
    p.tags = vec!["auth".to_string(), "jwt".to_string()];
    p.locations.push(Location::new("src/auth.ts", 12));
    p.metadata.custom = Some(serde_json::json!({ "framework": "express" }));
    p
}

/// Documented fields survive the round trip through the legacy shape.
#[test]
fn conversion_is_lossless_for_documented_fields() {
    let store = Arc::new(LegacyPatternStore::new());
    let adapter = LegacyStoreAdapter::new(Arc::clone(&store));

    let original = sample();
    adapter.add(&original).unwrap();
    let fetched = adapter.get("p1").unwrap();

    assert_eq!(fetched.id, original.id);
    assert_eq!(fetched.category, original.category);
    assert_eq!(fetched.subcategory, original.subcategory);
    assert_eq!(fetched.name, original.name);
    assert_eq!(fetched.description, original.description);
    assert_eq!(fetched.detection_method, original.detection_method);
    assert_eq!(fetched.confidence, original.confidence);
    assert_eq!(fetched.confidence_level, original.confidence_level);
    assert_eq!(fetched.severity, original.severity);
    assert_eq!(fetched.tags, original.tags);
    assert_eq!(fetched.locations.len(), 1);
    assert_eq!(fetched.status, PatternStatus::Discovered);
    assert_eq!(
        fetched.metadata.custom,
        Some(serde_json::json!({ "framework": "express" }))
    );
}

/// Approve via the adapter stamps approval and emits the unified event
/// built from a re-fetch.
#[test]
fn approve_emits_unified_event() {
    let store = Arc::new(LegacyPatternStore::new());
    let adapter = LegacyStoreAdapter::new(Arc::clone(&store));
    adapter.add(&sample()).unwrap();

    let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    adapter.on(move |e| {
        if let PatternEvent::Approved(p) = e {
            sink.lock().unwrap().push(format!("{}:{}", p.id, p.status));
        }
    });

    let approved = adapter.approve("p1", Some("alice")).unwrap();
    assert_eq!(approved.status, PatternStatus::Approved);
    assert!(approved.approved_at.is_some());
    assert_eq!(approved.approved_by.as_deref(), Some("alice"));

    let events = seen.lock().unwrap().clone();
    assert_eq!(events, vec!["p1:approved".to_string()]);
}

/// The legacy re-accept transition error is absorbed into an idempotent
/// no-op; the ignored→approved error is translated to the unified type.
#[test]
fn transition_errors_translated() {
    let store = Arc::new(LegacyPatternStore::new());
    let adapter = LegacyStoreAdapter::new(Arc::clone(&store));
    adapter.add(&sample()).unwrap();

    adapter.approve("p1", None).unwrap();
    // Legacy would raise InvalidStateTransition; the adapter absorbs it.
    assert!(adapter.approve("p1", None).is_ok());

    let mut other = sample();
    other.id = "p2".to_string();
    adapter.add(&other).unwrap();
    adapter.ignore("p2").unwrap();
    assert!(matches!(
        adapter.approve("p2", None),
        Err(PatternError::InvalidStatusTransition { .. })
    ));
}

/// Deletion events carry only id and category.
#[test]
fn delete_event_shape() {
    let store = Arc::new(LegacyPatternStore::new());
    let adapter = LegacyStoreAdapter::new(Arc::clone(&store));
    adapter.add(&sample()).unwrap();

    let seen: Arc<Mutex<Vec<(String, String)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    adapter.on(move |e| {
        if let PatternEvent::Deleted { id, category } = e {
            sink.lock().unwrap().push((id.clone(), category.clone()));
        }
    });

    assert!(adapter.delete("p1").unwrap());
    assert!(!adapter.delete("p1").unwrap());
    let events = seen.lock().unwrap().clone();
    assert_eq!(events, vec![("p1".to_string(), "security".to_string())]);
}

/// Revert clears the approval stamp so invariants hold.
#[test]
fn revert_clears_approval() {
    let store = Arc::new(LegacyPatternStore::new());
    let adapter = LegacyStoreAdapter::new(Arc::clone(&store));
    adapter.add(&sample()).unwrap();
    adapter.approve("p1", Some("alice")).unwrap();

    let reverted = adapter.revert("p1").unwrap();
    assert_eq!(reverted.status, PatternStatus::Discovered);
    assert!(reverted.approved_at.is_none());
    assert!(reverted.approved_by.is_none());
    assert!(reverted.invariants_hold());
}
