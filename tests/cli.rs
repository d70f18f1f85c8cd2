//! Exit-code and output tests for the `feedgate` binary.

use std::path::{Path, PathBuf};
use std::process::Command;

fn cli_exe() -> &'static str {
    env!("CARGO_BIN_EXE_feedgate")
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn project_with_fixture(name: &str, fixture_name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("feedgate_cli_{}", name));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(dir.join("_site")).unwrap();
    std::fs::copy(fixture(fixture_name), dir.join("_site").join("index.xml")).unwrap();
    dir
}

fn run(root: &Path, extra: &[&str]) -> std::process::Output {
    Command::new(cli_exe())
        .arg("--root")
        .arg(root)
        .args(extra)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run feedgate")
}

#[test]
fn valid_feed_exits_zero() {
    let dir = project_with_fixture("valid", "valid_feed.xml");

    let output = run(&dir, &["--no-build"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(0), "stdout: {stdout}");
    assert!(stdout.contains("RSS feed is valid"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn invalid_feed_exits_one() {
    let dir = project_with_fixture("invalid", "missing_description.xml");

    let output = run(&dir, &["--no-build"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("description"), "stdout: {stdout}");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn json_report_is_parseable() {
    let dir = project_with_fixture("json", "missing_description.xml");

    let output = run(&dir, &["--no-build", "--format", "json"]);
    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be a JSON report");
    assert_eq!(report["passed"], false);
    assert_eq!(report["steps"][1]["step"], "structure");
    assert_eq!(
        report["steps"][1]["finding"]["details"]["missing_elements"][0],
        "description"
    );

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn feed_flag_overrides_config_path() {
    let dir = project_with_fixture("feed_flag", "valid_feed.xml");
    std::fs::write(
        dir.join("feedgate.toml"),
        "feed_path = \"does/not/exist.xml\"\n",
    )
    .unwrap();

    assert_eq!(run(&dir, &["--no-build"]).status.code(), Some(1));
    assert_eq!(
        run(&dir, &["--no-build", "--feed", "_site/index.xml"]).status.code(),
        Some(0)
    );

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn invalid_config_exits_one() {
    let dir = project_with_fixture("bad_config", "valid_feed.xml");
    std::fs::write(dir.join("feedgate.toml"), "this is not [valid toml").unwrap();

    let output = run(&dir, &["--no-build"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load config"));

    std::fs::remove_dir_all(&dir).ok();
}
