//! Runs the `directable` binary end to end.

mod common;

use assert_cmd::Command;
use common::fixture;
use directable::report::DirectableReport;
use std::fs;
use tempfile::TempDir;

fn directable() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("directable").unwrap();
    cmd.env_remove("DIRECTABLE_LOG").env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_analyze_json_to_file() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("report.json");

    directable()
        .current_dir(temp.path())
        .arg("analyze")
        .arg(fixture("simple_directable.json"))
        .args(["--format", "json", "--output"])
        .arg(&output)
        .assert()
        .success();

    let report: DirectableReport =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(report.meths.len(), 1);
    assert_eq!(report.meths[0].name, "-[A run]");
}

#[test]
fn test_analyze_output_dir_then_merge() {
    let temp = TempDir::new().unwrap();
    let reports = temp.path().join("reports");
    let merged = temp.path().join("merged.json");

    directable()
        .current_dir(temp.path())
        .arg("analyze")
        .arg(fixture("simple_directable.json"))
        .arg(fixture("dynamic_selector.json"))
        .arg("--output-dir")
        .arg(&reports)
        .assert()
        .success();

    let written: Vec<String> = fs::read_dir(&reports)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(written.len(), 2);
    assert!(written.iter().any(|f| f.starts_with('A') && f.ends_with(".json")));
    assert!(written.iter().any(|f| f.starts_with('C') && f.ends_with(".json")));

    directable()
        .arg("merge")
        .arg("--input")
        .arg(&reports)
        .arg("--output")
        .arg(&merged)
        .assert()
        .success();

    let map: serde_json::Value = serde_json::from_str(&fs::read_to_string(&merged).unwrap()).unwrap();
    let map = map.as_object().unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map["/src/A.h:3:1"]["name"], "-[A run]");
    assert_eq!(map["/src/C.m:11:1"]["name"], "-[C bar]");
}

#[test]
fn test_output_file_with_two_inputs_fails() {
    let temp = TempDir::new().unwrap();
    directable()
        .current_dir(temp.path())
        .arg("analyze")
        .arg(fixture("simple_directable.json"))
        .arg(fixture("dynamic_selector.json"))
        .arg("--output")
        .arg(temp.path().join("out.json"))
        .assert()
        .failure();
}

#[test]
fn test_missing_input_fails() {
    let temp = TempDir::new().unwrap();
    directable()
        .current_dir(temp.path())
        .args(["analyze", "does-not-exist.json"])
        .assert()
        .failure();
}

#[test]
fn test_markdown_to_stdout() {
    let temp = TempDir::new().unwrap();
    let assert = directable()
        .current_dir(temp.path())
        .arg("analyze")
        .arg(fixture("category_aliasing.yaml"))
        .args(["--format", "markdown"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.contains("# Direct dispatch report: C+Extras"));
    assert!(stdout.contains("`-[C() name]`"));
}

#[test]
fn test_init_then_refuse_overwrite() {
    let temp = TempDir::new().unwrap();
    directable()
        .current_dir(temp.path())
        .arg("init")
        .assert()
        .success();
    assert!(temp.path().join(".directable.toml").exists());

    directable()
        .current_dir(temp.path())
        .arg("init")
        .assert()
        .failure();

    directable()
        .current_dir(temp.path())
        .args(["init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_configured_teardown_selectors_apply() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(".directable.toml"),
        "[analysis]\nteardown_selectors = [\"run\"]\n",
    )
    .unwrap();
    let output = temp.path().join("report.json");

    directable()
        .current_dir(temp.path())
        .arg("analyze")
        .arg(fixture("simple_directable.json"))
        .args(["--format", "json", "--output"])
        .arg(&output)
        .assert()
        .success();

    let report: DirectableReport =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert!(report.meths.is_empty());
}
