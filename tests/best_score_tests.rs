//! Best score tests - persistence across loads

use std::fs;

use tetris_2048::best_score::BestScore;

#[test]
fn test_record_then_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("best.txt");

    let mut best = BestScore::load(&path);
    assert_eq!(best.best(), 0);
    assert!(best.record(120).unwrap());
    assert_eq!(best.best(), 120);

    let reloaded = BestScore::load(&path);
    assert_eq!(reloaded.best(), 120);
    assert_eq!(reloaded.path(), path.as_path());
}

#[test]
fn test_lower_score_keeps_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("best.txt");
    fs::write(&path, "500\n").unwrap();

    let mut best = BestScore::load(&path);
    assert_eq!(best.best(), 500);
    assert!(!best.record(499).unwrap());
    assert!(!best.record(500).unwrap());
    assert_eq!(fs::read_to_string(&path).unwrap(), "500\n");
}

#[test]
fn test_whitespace_is_trimmed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("best.txt");
    fs::write(&path, "  2048 \n\n").unwrap();
    assert_eq!(BestScore::load(&path).best(), 2048);
}

#[test]
fn test_malformed_file_reads_as_zero_and_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("best.txt");
    fs::write(&path, "not a number").unwrap();

    let mut best = BestScore::load(&path);
    assert_eq!(best.best(), 0);
    assert!(best.record(8).unwrap());
    assert_eq!(BestScore::load(&path).best(), 8);
}

#[test]
fn test_unwritable_location_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("best.txt");
    let mut best = BestScore::load(&path);
    let err = best.record(10).unwrap_err();
    assert!(err.to_string().contains("failed to write best score"));
    assert_eq!(best.best(), 0);
}
