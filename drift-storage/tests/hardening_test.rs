//! Hardening tests — edge cases beyond happy-path coverage: unicode paths,
//! concurrent repository access, and stale temp files.

use std::fs;
use std::sync::Arc;

use drift_core::types::{DetectionMethod, Pattern};
use drift_storage::repository::PatternRepository;
use drift_storage::workspace::Workspace;

fn pattern(id: &str) -> Pattern {
    Pattern::discovered(id, "structural", id, "structural/shape", DetectionMethod::Structural, 0.8)
}

#[test]
fn harden_unicode_project_name() {
    let tmp = tempfile::tempdir().unwrap();
    let unicode_dir = tmp.path().join("项目-проект-プロジェクト");
    fs::create_dir_all(&unicode_dir).unwrap();

    let ws = Workspace::at(&unicode_dir);
    ws.initialize().unwrap();
    assert!(unicode_dir.join(".drift").join("config.json").exists());

    let repo = PatternRepository::new(ws);
    repo.initialize().unwrap();
    repo.add(pattern("p1")).unwrap();
    repo.save_all().unwrap();

    let reloaded = PatternRepository::new(Workspace::at(&unicode_dir));
    reloaded.initialize().unwrap();
    assert!(reloaded.exists("p1").unwrap());
}

#[test]
fn harden_pattern_ids_with_special_characters() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = PatternRepository::new(Workspace::at(tmp.path()));
    repo.initialize().unwrap();

    // Slashes and dots must not escape the status directory on disk.
    repo.add(pattern("security/jwt.validation")).unwrap();
    repo.add(pattern("../escape-attempt")).unwrap();
    repo.save_all().unwrap();

    let ws = Workspace::at(tmp.path());
    let discovered: Vec<_> = fs::read_dir(ws.patterns_dir("discovered"))
        .unwrap()
        .flatten()
        .collect();
    assert_eq!(discovered.len(), 2);
    assert!(!tmp.path().join("escape-attempt.json").exists());

    let reloaded = PatternRepository::new(Workspace::at(tmp.path()));
    reloaded.initialize().unwrap();
    assert!(reloaded.exists("security/jwt.validation").unwrap());
}

#[test]
fn harden_concurrent_writers_and_readers() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = Arc::new(PatternRepository::new(Workspace::at(tmp.path())));
    repo.initialize().unwrap();

    let mut handles = Vec::new();
    for t in 0..4 {
        let repo = Arc::clone(&repo);
        handles.push(std::thread::spawn(move || {
            for i in 0..25 {
                repo.add(pattern(&format!("t{t}-p{i}"))).unwrap();
                // Interleave reads to exercise the snapshot path.
                let _ = repo.count(None).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(repo.count(None).unwrap(), 100);
}

#[test]
fn harden_stale_tmp_file_ignored_on_load() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = PatternRepository::new(Workspace::at(tmp.path()));
    repo.initialize().unwrap();
    repo.add(pattern("p1")).unwrap();
    repo.save_all().unwrap();

    // A crash mid-save leaves a .tmp file behind; loads must ignore it.
    let ws = Workspace::at(tmp.path());
    fs::write(ws.patterns_dir("discovered").join("p2.tmp"), b"partial").unwrap();

    let reloaded = PatternRepository::new(Workspace::at(tmp.path()));
    reloaded.initialize().unwrap();
    assert_eq!(reloaded.count(None).unwrap(), 1);
}

#[test]
fn harden_empty_workspace_loads_clean() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = PatternRepository::new(Workspace::at(tmp.path()));
    repo.initialize().unwrap();
    assert_eq!(repo.count(None).unwrap(), 0);
    assert_eq!(repo.save_all().unwrap(), 0);
}
