//! End-to-end runs of the `stylescope` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn demo() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/landing.json")
}

/// Config that keeps log files inside `dir`.
fn config(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("stylescope.toml");
    let logs = dir.path().join("logs");
    std::fs::write(
        &path,
        format!("[logging]\nlevel = \"warn\"\ndir = \"{}\"\n", logs.display()),
    )
    .unwrap();
    path
}

fn run(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stylescope"))
        .arg("--config")
        .arg(config(dir))
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn classify_restricted_url() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&dir, &["classify", "chrome://settings"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Restricted:  true"));
    assert!(text.contains("browser-internal"));
}

#[test]
fn analyze_prints_json() {
    let dir = tempfile::tempdir().unwrap();
    let demo = demo();
    let output = run(&dir, &["analyze", demo.to_str().unwrap(), "--json"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let analysis: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(analysis["colors"][0]["hex"], "#0f172a");
    assert_eq!(analysis["colors"][0]["frequency"], 3);
    assert_eq!(analysis["fonts"][0]["family"], "Inter, system-ui, sans-serif");
    assert_eq!(analysis["fonts"][1]["family"], "Georgia, serif");
}

#[test]
fn analyze_table_uses_format() {
    let dir = tempfile::tempdir().unwrap();
    let demo = demo();
    let output = run(&dir, &["analyze", demo.to_str().unwrap(), "--format", "rgb"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("rgb(15, 23, 42)"));
}

#[test]
fn analyze_restricted_snapshot_fails() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("newtab.json");
    std::fs::write(&snapshot, r#"{"url": "chrome://newtab", "root": {"tag": "html"}}"#).unwrap();

    let output = run(&dir, &["analyze", snapshot.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("browser internal"));
}

#[test]
fn export_writes_tailwind_config() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("theme");
    let demo = demo();
    let output = run(
        &dir,
        &["export", demo.to_str().unwrap(), "--output", out.to_str().unwrap()],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let written = std::fs::read_to_string(out.join("tailwind.config.js")).unwrap();
    let config: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(config["theme"]["extend"]["colors"]["custom-1"], "#0f172a");
    assert_eq!(config["theme"]["extend"]["fontFamily"]["custom-1"][0], "Inter");
    assert_eq!(config["theme"]["extend"]["fontFamily"]["custom-2"][0], "Georgia");
}

#[test]
fn pick_reports_element() {
    let dir = tempfile::tempdir().unwrap();
    let demo = demo();
    let output = run(&dir, &["pick", demo.to_str().unwrap(), "--target", "buy"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let text = stdout(&output);
    assert!(text.contains("Element: button#buy.btn.btn-primary"));
    assert!(text.contains("Buy now"));
    assert!(text.contains("Background:  #3b82f6"));
    assert!(text.contains("Padding:     10px 20px"));
}

#[test]
fn pick_unknown_target_fails() {
    let dir = tempfile::tempdir().unwrap();
    let demo = demo();
    let output = run(&dir, &["pick", demo.to_str().unwrap(), "--target", "missing"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No element with id"));
}
