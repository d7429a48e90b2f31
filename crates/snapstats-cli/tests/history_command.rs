use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[allow(deprecated)]
fn get_snapstats_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("snapstats")
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn record(history: &Path, sample: &str) {
    let mut cmd = Command::new(get_snapstats_bin());
    cmd.arg("report")
        .arg(fixture(sample))
        .arg("--record")
        .arg("--format")
        .arg("json")
        .arg("--history-file")
        .arg(history);
    cmd.assert().success();
}

fn history_json(history: &Path) -> serde_json::Value {
    let mut cmd = Command::new(get_snapstats_bin());
    cmd.arg("history")
        .arg("--format")
        .arg("json")
        .arg("--history-file")
        .arg(history);
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn test_history_starts_empty() {
    let dir = TempDir::new().unwrap();
    let history = dir.path().join("history.json");

    let mut cmd = Command::new(get_snapstats_bin());
    cmd.arg("history").arg("--history-file").arg(&history);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No runs recorded yet"));
}

#[test]
fn test_recorded_runs_show_up() {
    let dir = TempDir::new().unwrap();
    let history = dir.path().join("nested").join("history.json");

    record(&history, "sample.json");
    record(&history, "fast-page.json");

    let json = history_json(&history);
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["ttfb"], 450.0);
    assert_eq!(entries[0]["lcp"], 2800.0);
    assert_eq!(entries[1]["lcp"], 1300.0);

    // heights are relative to the largest value seen
    let points = json["points"].as_array().unwrap();
    assert_eq!(points[0]["height"], 100.0);
    let second = points[1]["height"].as_f64().unwrap();
    assert!((second - 1300.0 / 2800.0 * 100.0).abs() < 1e-9);
}

#[test]
fn test_history_keeps_last_five_runs() {
    let dir = TempDir::new().unwrap();
    let history = dir.path().join("history.json");

    for _ in 0..6 {
        record(&history, "fast-page.json");
    }

    let json = history_json(&history);
    assert_eq!(json["entries"].as_array().unwrap().len(), 5);
}

#[test]
fn test_history_clear() {
    let dir = TempDir::new().unwrap();
    let history = dir.path().join("history.json");
    record(&history, "sample.json");

    let mut cmd = Command::new(get_snapstats_bin());
    cmd.arg("history")
        .arg("--clear")
        .arg("--history-file")
        .arg(&history);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("History cleared"));

    let json = history_json(&history);
    assert!(json["entries"].as_array().unwrap().is_empty());
}

#[test]
fn test_corrupted_history_is_reset() {
    let dir = TempDir::new().unwrap();
    let history = dir.path().join("history.json");
    std::fs::write(&history, "{\"not\": \"an array\"}").unwrap();

    let json = history_json(&history);
    assert!(json["entries"].as_array().unwrap().is_empty());

    record(&history, "fast-page.json");
    let json = history_json(&history);
    assert_eq!(json["entries"].as_array().unwrap().len(), 1);
}

#[test]
fn test_history_table_output() {
    let dir = TempDir::new().unwrap();
    let history = dir.path().join("history.json");
    record(&history, "sample.json");

    let mut cmd = Command::new(get_snapstats_bin());
    cmd.arg("history")
        .arg("--format")
        .arg("table")
        .arg("--history-file")
        .arg(&history);

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("timestamp,ttfb,fcp,lcp,height"))
        .stdout(predicate::str::contains(",450.00,1200.00,2800.00,100.00"));
}

#[test]
fn test_history_file_from_environment() {
    let dir = TempDir::new().unwrap();
    let history = dir.path().join("env-history.json");

    let mut cmd = Command::new(get_snapstats_bin());
    cmd.env("SNAPSTATS_HISTORY_FILE", &history)
        .arg("report")
        .arg(fixture("fast-page.json"))
        .arg("--record");
    cmd.assert().success();

    assert!(history.exists());
}
