use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn get_snapstats_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("snapstats")
}

#[test]
fn test_analyze_help() {
    let mut cmd = Command::new(get_snapstats_bin());
    cmd.arg("analyze").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--window-ms"))
        .stdout(predicate::str::contains("--timeout-secs"))
        .stdout(predicate::str::contains("--chrome-path"))
        .stdout(predicate::str::contains("[default: 3000]"))
        .stdout(predicate::str::contains("[default: 30]"));
}

#[test]
fn test_analyze_rejects_browser_pages() {
    let mut cmd = Command::new(get_snapstats_bin());
    cmd.arg("analyze").arg("chrome://settings");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains(
            "Cannot analyze this page type. Please navigate to a regular website.",
        ))
        .stderr(predicate::str::contains(
            "Suggestion: Try navigating to a regular website (like google.com) and run the analysis.",
        ));
}

#[test]
fn test_analyze_rejects_empty_target() {
    let mut cmd = Command::new(get_snapstats_bin());
    cmd.arg("analyze").arg("");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No active tab found"))
        .stderr(predicate::str::contains(
            "Please make sure you have a browser tab open and try again.",
        ));
}

#[test]
fn test_analyze_missing_chrome_writes_no_history() {
    let dir = TempDir::new().unwrap();
    let history = dir.path().join("history.json");

    let mut cmd = Command::new(get_snapstats_bin());
    cmd.arg("analyze")
        .arg("example.com")
        .arg("--chrome-path")
        .arg(dir.path().join("no-such-chrome"))
        .arg("--format")
        .arg("json")
        .arg("--history-file")
        .arg(&history)
        .arg("--settings-file")
        .arg(dir.path().join("settings.json"));

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Chrome not found"))
        .stderr(predicate::str::contains("Suggestion:"));

    assert!(!history.exists());
}
