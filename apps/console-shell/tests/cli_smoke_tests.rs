#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for the console-shell binary
//!
//! These run the built binary and check configuration layering, help output,
//! and the commands that work without a reachable backend.

use std::fs;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn console_shell() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_console-shell"));
    command
        .env_remove("RUST_LOG")
        .env_remove("SHELL__SESSION__BASE_URL")
        .env_remove("SHELL__SESSION__AUTH_TOKEN")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    command
}

fn run(args: &[&str]) -> Output {
    console_shell()
        .args(args)
        .output()
        .expect("Failed to execute console-shell")
}

fn write_config(dir: &TempDir, contents: &str) -> String {
    let path = dir.path().join("config.yaml");
    fs::write(&path, contents).expect("Failed to write config");
    path.to_string_lossy().into_owned()
}

#[test]
fn test_cli_help_command() {
    let output = run(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    for subcommand in ["check", "bootstrap", "filter-link", "switch-team", "switch-org", "logout"] {
        assert!(stdout.contains(subcommand), "Should list '{subcommand}'");
    }
    assert!(stdout.contains("--config"), "Should mention config option");
}

#[test]
fn test_cli_version_command() {
    let output = run(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("console-shell"), "Should contain binary name");
    assert!(
        stdout.chars().any(|c| c.is_ascii_digit()),
        "Should contain version numbers"
    );
}

#[test]
fn test_cli_invalid_command() {
    let output = run(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "Should report an error: {stderr}");
}

#[test]
fn test_cli_config_validation_missing_file() {
    let output = run(&["--config", "/nonexistent/config.yaml", "check"]);

    assert!(
        !output.status.success(),
        "Should fail when config file doesn't exist"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("does not exist"),
        "Should indicate config file not found: {stderr}"
    );
}

#[test]
fn test_cli_check_prints_effective_config_without_secrets() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(
        &temp_dir,
        r#"
session:
  base_url: "https://console.example.com/"
  auth_token: "phx_very_secret"
shell:
  flags_timeout_ms: 500
logging:
  level: warn
"#,
    );

    let output = run(&["--config", &config, "check"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "check should succeed: {stderr}");
    assert!(stdout.contains("Configuration is valid"));
    assert!(stdout.contains("https://console.example.com/"));
    assert!(stdout.contains("\"flags_timeout_ms\": 500"));
    assert!(
        !stdout.contains("phx_very_secret") && !stderr.contains("phx_very_secret"),
        "Secret must never be printed"
    );
}

#[test]
fn test_cli_env_and_flag_overrides() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(&temp_dir, "session:\n  base_url: \"https://file.example.com/\"\n");

    let output = console_shell()
        .args(["--config", &config, "check"])
        .env("SHELL__SESSION__BASE_URL", "https://env.example.com/")
        .output()
        .expect("Failed to execute console-shell");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("https://env.example.com/"), "{stdout}");
    assert!(!stdout.contains("https://file.example.com/"), "{stdout}");

    let output = console_shell()
        .args(["--config", &config, "--base-url", "https://flag.example.com/", "check"])
        .env("SHELL__SESSION__BASE_URL", "https://env.example.com/")
        .output()
        .expect("Failed to execute console-shell");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("https://flag.example.com/"), "{stdout}");
}

#[test]
fn test_cli_rejects_unknown_config_fields() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(&temp_dir, "session:\n  bogus_field: 1\n");

    let output = run(&["--config", &config, "check"]);

    assert!(!output.status.success(), "Unknown fields should be rejected");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bogus_field"), "{stderr}");
}

#[test]
fn test_cli_rejects_non_http_base_url() {
    let output = run(&["--base-url", "ftp://example.com/", "check"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("http or https"), "{stderr}");
}

#[test]
fn test_cli_print_config() {
    let output = run(&["--print-config"]);

    assert!(output.status.success());
    let printed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("print-config should emit JSON");
    assert_eq!(printed["session"]["switch_debounce_ms"], 10);
    assert_eq!(printed["shell"]["spinner_delay_ms"], 1000);
    assert!(printed["session"].get("auth_token").is_none());
}

#[test]
fn test_cli_filter_link_toggles_properties() {
    let filters = r#"{"properties":[{"key":"browser","value":"Chrome"}]}"#;

    let output = run(&["filter-link", "browser", "Chrome", "--filters", filters]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "/events?properties=%5B%5D"
    );

    let output = run(&[
        "filter-link",
        "os",
        "Mac",
        "--filters",
        filters,
        "--path",
        "/insights",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("/insights?properties="), "{stdout}");
    assert!(stdout.contains("%22browser%22"), "{stdout}");
    assert!(stdout.contains("%22os%22"), "{stdout}");
}

#[test]
fn test_cli_filter_link_rejects_bad_filters() {
    let output = run(&["filter-link", "os", "Mac", "--filters", "[1, 2]"]);
    assert!(!output.status.success());
}

#[test]
fn test_cli_bootstrap_without_backend_renders_anonymous_scene() {
    let output = console_shell()
        .args([
            "--base-url",
            "http://127.0.0.1:9/",
            "bootstrap",
            "--path",
            "/login",
            "--flags",
            "{}",
            "--wait-ms",
            "5000",
        ])
        .env("SHELL__SESSION__REQUEST_TIMEOUT_MS", "500")
        .output()
        .expect("Failed to execute console-shell");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "bootstrap should succeed: {stderr}");

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("bootstrap should emit JSON");
    assert_eq!(report["signed_in"], false);
    assert_eq!(report["ready"], true);
    assert_eq!(report["location"], "/login");
    assert_eq!(report["view"]["view"], "frame");
    assert_eq!(report["view"]["layout"]["shell"], "bare");
}
