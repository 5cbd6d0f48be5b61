//! CLI Integration Tests for SupportBot
//!
//! Runs the built binary to cover the startup checks: configuration loading,
//! credential validation, knowledge file loading and the `check` subcommand.
//! Every failing case must exit non-zero before binding a port.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const KEY_ENV: &str = "SUPPORTBOT_CLI_TEST_KEY";

fn run_supportbot(args: &[&str], working_dir: &Path, api_key: Option<&str>) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_supportbot-server"));
    cmd.args(args)
        .current_dir(working_dir)
        .env_remove(KEY_ENV)
        .env_remove("RUST_LOG");
    if let Some(key) = api_key {
        cmd.env(KEY_ENV, key);
    }
    cmd.output().expect("Failed to execute binary")
}

/// Temp project with a config pointing at an unused port and this test's key variable.
fn project(knowledge: Option<&str>) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("supportbot.toml"),
        format!(
            r#"
[server]
port = 1

[knowledge]
path = "knowledge_base.md"

[rag]
chunk_size = 60
chunk_overlap = 0

[llm]
api_key_env = "{}"
api_base = "http://127.0.0.1:1/v1beta"
"#,
            KEY_ENV
        ),
    )
    .unwrap();
    if let Some(text) = knowledge {
        fs::write(dir.path().join("knowledge_base.md"), text).unwrap();
    }
    dir
}

const KNOWLEDGE: &str = "Goodluck Cafe is open from 9am to 9pm daily.\n\n\
                         We are located on FC Road in Pune.\n\n\
                         Our menu features bun maska, chai and filter coffee.\n";

// =============================================================================
// Help and Version
// =============================================================================

#[test]
fn test_help_command() {
    let dir = TempDir::new().unwrap();
    let output = run_supportbot(&["--help"], dir.path(), None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("SupportBot"));
    assert!(stdout.contains("check"));
    assert!(stdout.contains("--config"));
}

#[test]
fn test_version_command() {
    let dir = TempDir::new().unwrap();
    let output = run_supportbot(&["--version"], dir.path(), None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

// =============================================================================
// Check Command
// =============================================================================

#[test]
fn test_check_reports_chunks() {
    let dir = project(Some(KNOWLEDGE));
    let output = run_supportbot(&["check", "--no-color"], dir.path(), Some("k"));

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("chunks: 3"));
    assert!(stdout.contains("[OK]"));
}

#[test]
fn test_check_warns_without_key() {
    let dir = project(Some(KNOWLEDGE));
    let output = run_supportbot(&["check", "--no-color"], dir.path(), None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(KEY_ENV));
    assert!(stdout.contains("[WARN]"));
}

#[test]
fn test_check_fails_without_knowledge() {
    let dir = project(None);
    let output = run_supportbot(&["check", "--no-color"], dir.path(), Some("k"));

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"));
}

// =============================================================================
// Startup Failures
// =============================================================================

#[test]
fn test_serve_fails_without_api_key() {
    let dir = project(Some(KNOWLEDGE));
    let output = run_supportbot(&["--no-color"], dir.path(), None);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(KEY_ENV));
}

#[test]
fn test_serve_fails_with_blank_api_key() {
    let dir = project(Some(KNOWLEDGE));
    let output = run_supportbot(&["--no-color"], dir.path(), Some("   "));

    assert!(!output.status.success());
}

#[test]
fn test_serve_fails_without_knowledge_file() {
    let dir = project(None);
    let output = run_supportbot(&["--no-color"], dir.path(), Some("k"));

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("knowledge"));
}

#[test]
fn test_serve_fails_with_empty_knowledge_file() {
    let dir = project(Some("  \n\n"));
    let output = run_supportbot(&["--no-color"], dir.path(), Some("k"));

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("empty"));
}

#[test]
fn test_explicit_missing_config_is_error() {
    let dir = TempDir::new().unwrap();
    let output = run_supportbot(&["--config", "nope.toml", "check"], dir.path(), None);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nope.toml"));
}
