use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Write a config that never touches the network or a model file.
fn offline_config(dir: &Path) -> PathBuf {
    let path = dir.join("config.json");
    fs::write(
        &path,
        r#"{
  "classification": { "use_statistical": false },
  "extraction": { "fallback_enabled": false }
}"#,
    )
    .unwrap();
    path
}

fn docsift(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("docsift").unwrap();
    cmd.arg("--config").arg(config);
    cmd
}

#[test]
fn process_invoice_as_json() {
    let dir = TempDir::new().unwrap();
    let config = offline_config(dir.path());
    let input = dir.path().join("invoice.txt");
    fs::write(&input, "Invoice #123. Date: 2023-01-01. Total: $500.00").unwrap();

    let output = docsift(&config).arg("process").arg(&input).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["category"], "Invoice");
    assert_eq!(value["classification_method"], "rules");
    assert_eq!(value["fields"]["total_amount"], 500.0);
    assert_eq!(value["fields"]["date"], "2023-01-01");
    assert_eq!(value["method"], "rules + pattern");
}

#[test]
fn process_text_format() {
    let dir = TempDir::new().unwrap();
    let config = offline_config(dir.path());
    let input = dir.path().join("statement.txt");
    fs::write(&input, "Bank Statement. Ending Balance $1000.00.").unwrap();

    docsift(&config)
        .args(["process", "--format", "text"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Category: Bank Statement"))
        .stdout(predicate::str::contains("Total: -"));
}

#[test]
fn process_rejects_empty_document() {
    let dir = TempDir::new().unwrap();
    let config = offline_config(dir.path());
    let input = dir.path().join("empty.txt");
    fs::write(&input, "\n\n").unwrap();

    docsift(&config)
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No text"));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let dir = TempDir::new().unwrap();
    let config = offline_config(dir.path());
    let docs = dir.path().join("docs");
    let out = dir.path().join("out");
    fs::create_dir_all(&docs).unwrap();
    fs::write(docs.join("a.txt"), "Invoice #1. Date: 2024-02-01. Total: $10.00").unwrap();
    fs::write(docs.join("b.txt"), "Payment Receipt. Paid $20.00 on 12/12/2023.").unwrap();
    fs::write(docs.join("c.txt"), "").unwrap();

    let pattern = docs.join("*.txt");
    docsift(&config)
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .arg("--output-dir")
        .arg(&out)
        .args(["--summary", "--continue-on-error", "-j", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 files"));

    assert!(out.join("a.json").exists());
    assert!(out.join("b.json").exists());
    assert!(!out.join("c.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("a.txt,success,Invoice,"));
    assert!(lines[2].starts_with("b.txt,success,Unknown,"));
    assert!(lines[3].starts_with("c.txt,error,"));
}

#[test]
fn batch_stops_on_error_by_default() {
    let dir = TempDir::new().unwrap();
    let config = offline_config(dir.path());
    fs::write(dir.path().join("blank.txt"), " ").unwrap();

    let pattern = dir.path().join("*.txt");
    docsift(&config)
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn batch_does_not_start_files_after_a_failure() {
    let dir = TempDir::new().unwrap();
    let config = offline_config(dir.path());
    let out = dir.path().join("out");
    fs::write(dir.path().join("a_blank.txt"), " ").unwrap();
    fs::write(dir.path().join("b_invoice.txt"), "Invoice #1. Date: 2024-02-01. Total: $10.00").unwrap();

    let pattern = dir.path().join("*.txt");
    docsift(&config)
        .env("RUST_LOG", "debug")
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .arg("--output-dir")
        .arg(&out)
        .args(["-j", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"))
        .stderr(predicate::str::contains("a_blank.txt"))
        .stderr(predicate::str::contains("b_invoice.txt").not());

    assert!(!out.join("b_invoice.json").exists());
}

#[test]
fn evaluate_reports_metrics() {
    let dir = TempDir::new().unwrap();
    let config = offline_config(dir.path());
    let cases = dir.path().join("cases.json");
    fs::write(
        &cases,
        r#"[
  {"text": "Invoice #123. Date: 2023-01-01. Total: $500.00", "category": "Invoice",
   "expected": {"total_amount": 500.0, "date": "2023-01-01"}},
  {"text": "Bank Statement. Ending Balance $1000.00.", "category": "Bank Statement",
   "expected": {}}
]"#,
    )
    .unwrap();

    docsift(&config)
        .arg("evaluate")
        .arg(&cases)
        .assert()
        .success()
        .stdout(predicate::str::contains("Classification Accuracy: 100.0%"))
        .stdout(predicate::str::contains("F1: 1.00"));

    let output = docsift(&config).arg("evaluate").arg(&cases).arg("--json").output().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["cases"], 2);
    assert_eq!(value["total_amount"]["true_positives"], 1);
}

#[test]
fn config_init_set_get() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.json");

    docsift(&path)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));
    assert!(path.exists());

    docsift(&path)
        .args(["config", "set", "classification.rule_threshold", "0.9"])
        .assert()
        .success();

    docsift(&path)
        .args(["config", "get", "classification.rule_threshold"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.9"));

    docsift(&path)
        .args(["config", "set", "classification.rule_threshold", "1.5"])
        .assert()
        .failure();

    docsift(&path)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
