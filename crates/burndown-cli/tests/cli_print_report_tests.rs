//! End-to-end tests of the `burndown` binary over snapshot fixtures

use serde_json::{json, Value};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn snapshot(date: &str, keys: &[&str], features: &[&str]) -> Value {
    json!({
        "meta": {
            "date": date,
            "browserCompatDataCommitHash": "bcd0001",
            "webFeaturesVersion": "2.1.0",
            "caniuseVersion": "1.0.30001600",
            "mdnContentCommitHash": "content0001"
        },
        "browserCompatData": { "keys": keys },
        "mdnContent": { "browserCompatKeys": keys },
        "caniuse": { "ids": ["flexbox", "css-grid"] },
        "webFeatures": {
            "ids": features,
            "mdnBrowserCompatDataKeys": &keys[..1],
            "caniuseIds": ["css-grid"]
        }
    })
}

fn write_fixture(dir: &Path, file_name: &str, value: &Value) {
    std::fs::write(dir.join(file_name), serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

fn reports_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_fixture(
        dir.path(),
        "20240101T000000000Z.json",
        &snapshot("2024-01-01T00:00:00Z", &["api.fetch", "css.properties.gap"], &["fetch"]),
    );
    write_fixture(
        dir.path(),
        "20240108T000000000Z.json",
        &snapshot(
            "2024-01-08T00:00:00Z",
            &["api.fetch", "css.properties.gap", "css.properties.zoom"],
            &["fetch", "gap"],
        ),
    );
    dir
}

fn burndown(reports: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_burndown"))
        .args(args)
        .env("REPORTS_DIR", reports)
        .env("RUST_LOG", "off")
        .env_remove("LOG_FORMAT")
        .output()
        .expect("failed to run burndown")
}

#[test]
fn test_print_report_text() {
    let dir = reports_dir();
    let output = burndown(dir.path(), &["print-report", "2024-01-01", "2024-01-08"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Metric"));
    assert!(stdout.contains("browser-compat-data keys"));
    assert!(stdout.contains("From 2024-01-01 to 2024-01-08 (7 days)"));
}

#[test]
fn test_print_report_nearest_earlier_snapshot() {
    let dir = reports_dir();
    let output = burndown(dir.path(), &["print-report", "2024-01-05", "2024-01-31"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("From 2024-01-01 to 2024-01-08"));
}

#[test]
fn test_print_report_json() {
    let dir = reports_dir();
    let output = burndown(
        dir.path(),
        &["print-report", "2024-01-01", "2024-01-08", "--format", "json"],
    );

    assert!(output.status.success());
    let delta: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(delta["elapsedDays"], 7);
}

#[test]
fn test_print_report_csv_rows() {
    let dir = reports_dir();
    let output = burndown(
        dir.path(),
        &["print-report", "2024-01-01", "2024-01-08", "--format", "csv"],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.lines().next(),
        Some("section,metric,before,after,change,percent")
    );
}

#[test]
fn test_missing_snapshot_fails() {
    let dir = reports_dir();
    let output = burndown(dir.path(), &["print-report", "2023-12-01", "2024-01-08"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Snapshot not found for date 2023-12-01"), "stderr: {stderr}");
}

#[test]
fn test_publish_statistics_prints_markdown_without_url() {
    let dir = reports_dir();
    let output = Command::new(env!("CARGO_BIN_EXE_burndown"))
        .args(["publish-statistics", "2024-01-01", "2024-01-08"])
        .env("REPORTS_DIR", dir.path())
        .env("RUST_LOG", "off")
        .env_remove("ISSUE_URL")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout)
        .starts_with("## Burndown statistics, 2024-01-01 to 2024-01-08"));
}

#[test]
fn test_load_sqlite_counts_snapshots() {
    let dir = reports_dir();
    let db = dir.path().join("summary.sqlite");
    let output = burndown(dir.path(), &["load-sqlite", "--db", db.to_str().unwrap()]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Loaded 2 snapshots"));
    assert!(db.exists());
}

#[test]
fn test_missing_reports_dir_is_reported() {
    let output = Command::new(env!("CARGO_BIN_EXE_burndown"))
        .args(["print-report", "2024-01-01", "2024-01-08"])
        .env_remove("REPORTS_DIR")
        .env("RUST_LOG", "off")
        .current_dir(std::env::temp_dir())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("REPORTS_DIR"));
}
