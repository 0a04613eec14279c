#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for the calculator-server binary
//!
//! These tests verify that the CLI commands work correctly, including
//! configuration validation, help output and config printing.

use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Helper to run the calculator-server binary with given arguments
fn run_calculator_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_calculator-server"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute calculator-server")
}

fn write_config(dir: &TempDir, contents: &str) -> String {
    let path = dir.path().join("config.yaml");
    let mut file = std::fs::File::create(&path).expect("Failed to create config file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write config file");
    path.to_string_lossy().into_owned()
}

#[test]
fn test_cli_help_command() {
    let output = run_calculator_server(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("calculator-server"),
        "Should contain binary name"
    );
    assert!(
        stdout.contains("Usage:") || stdout.contains("USAGE:"),
        "Should contain usage information"
    );
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--port"), "Should mention port option");
}

#[test]
fn test_cli_version_command() {
    let output = run_calculator_server(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "Should print the package version"
    );
}

#[test]
fn test_cli_check_with_defaults() {
    let output = run_calculator_server(&["check"]);

    assert!(output.status.success(), "Check should succeed with defaults");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration is valid"));
    assert!(stdout.contains("127.0.0.1:8080"));
}

#[test]
fn test_cli_check_with_config_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(
        &dir,
        r#"
server:
  bind_addr: "0.0.0.0:9090"
calculator:
  page_title: "Office Calculator"
"#,
    );

    let output = run_calculator_server(&["--config", &path, "check"]);

    assert!(output.status.success(), "Check should accept a valid config");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0.0.0.0:9090"));
    assert!(stdout.contains("Office Calculator"));
}

#[test]
fn test_cli_check_rejects_unknown_keys() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(&dir, "server:\n  port: 9090\n");

    let output = run_calculator_server(&["--config", &path, "check"]);

    assert!(!output.status.success(), "Unknown keys should fail");
}

#[test]
fn test_cli_nonexistent_config_file() {
    let output = run_calculator_server(&["--config", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success(), "Missing config file should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("does not exist"),
        "Should explain the failure, got: {stderr}"
    );
}

#[test]
fn test_cli_print_config_applies_overrides() {
    let output = run_calculator_server(&["--print-config", "--port", "9191", "-vv"]);

    assert!(output.status.success(), "Print config should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Effective configuration:"));
    assert!(stdout.contains("127.0.0.1:9191"));
    assert!(stdout.contains("debug"));

    let yaml = stdout
        .split_once('\n')
        .map(|(_, rest)| rest)
        .unwrap_or_default();
    let parsed: Result<serde_json::Value, _> = serde_saphyr::from_str(yaml);
    assert!(parsed.is_ok(), "Output should be valid YAML");
}

#[test]
fn test_cli_env_override() {
    let output = Command::new(env!("CARGO_BIN_EXE_calculator-server"))
        .args(["--print-config"])
        .env("CALC__CALCULATOR__PAGE_TITLE", "From Env")
        .output()
        .expect("Failed to execute calculator-server");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("From Env"));
}
