//! Integration tests for the `latchkey` CLI binary.
//!
//! Parsing, help, completions, and the session guard run without a device.
//! The login flow runs against a wiremock server standing in for one.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// A `latchkey` command whose config and session live under `home`.
fn latchkey_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("latchkey");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_STATE_HOME", home.join("state"))
        .env("LATCHKEY_STATE_DIR", home.join("session"))
        .env("NO_COLOR", "1")
        .env_remove("LATCHKEY_OUTPUT")
        .env_remove("LATCHKEY_TIMEOUT")
        .env_remove("LATCHKEY_AUTH_KEY")
        .env_remove("LATCHKEY_DEFAULTS_OUTPUT")
        .env_remove("LATCHKEY_DEVICE_IP")
        .env_remove("COLORFGBG")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = latchkey_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_sections() {
    let home = TempDir::new().unwrap();
    latchkey_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("cards")
            .and(predicate::str::contains("wifi"))
            .and(predicate::str::contains("schedules"))
            .and(predicate::str::contains("firmware")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    latchkey_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("latchkey"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();
    for shell in ["bash", "fish"] {
        latchkey_cmd(home.path())
            .args(["completions", shell])
            .assert()
            .success()
            .stdout(predicate::str::is_empty().not());
    }
    latchkey_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Parse errors ────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let home = TempDir::new().unwrap();
    let output = latchkey_cmd(home.path()).arg("foobar").output().unwrap();
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("foobar"));
}

#[test]
fn test_invalid_output_format() {
    let home = TempDir::new().unwrap();
    let output = latchkey_cmd(home.path())
        .args(["--output", "xml", "status"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("possible values"));
}

// ── Session guard ───────────────────────────────────────────────────

#[test]
fn test_protected_command_requires_login() {
    let home = TempDir::new().unwrap();
    latchkey_cmd(home.path())
        .args(["cards", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("latchkey login"));
}

#[test]
fn test_local_commands_work_without_login() {
    let home = TempDir::new().unwrap();
    latchkey_cmd(home.path()).arg("menu").assert().success().stdout(
        predicate::str::contains("latchkey cards").and(predicate::str::contains("/dashboard")),
    );
    latchkey_cmd(home.path())
        .args(["-o", "json", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"authorized\": false"));
}

#[test]
fn test_theme_choice_persists() {
    let home = TempDir::new().unwrap();
    latchkey_cmd(home.path())
        .args(["theme", "set", "light"])
        .assert()
        .success();
    latchkey_cmd(home.path())
        .args(["theme", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("light"));
    latchkey_cmd(home.path())
        .args(["theme", "toggle"])
        .assert()
        .success();
    latchkey_cmd(home.path())
        .args(["-o", "plain", "theme"])
        .assert()
        .success()
        .stdout("dark\n");
}

#[test]
fn test_corrupt_session_file_reads_as_logged_out() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("session");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("session.toml"), "authorized = [").unwrap();

    latchkey_cmd(home.path())
        .arg("logout")
        .assert()
        .success()
        .stderr(predicate::str::contains("Not logged in"));
    latchkey_cmd(home.path())
        .args(["cards", "list"])
        .assert()
        .code(3);
}

#[test]
fn test_login_rejects_bad_address() {
    let home = TempDir::new().unwrap();
    latchkey_cmd(home.path())
        .args(["login", "300.1.1.1", "--auth-key", "k"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("valid IPv4 address"));
}

// ── Against a device ────────────────────────────────────────────────

async fn device() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth-key"))
        .and(header("X-Auth-Key", "k1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth-key"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cards"))
        .and(query_param("page", "1"))
        .and(header("X-Auth-Key", "k1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [{"id": 1, "number": "00AF12", "start_date": "2024-01-01"}],
            "pagination": {"total": 1, "page": 1, "per_page": 10, "total_pages": 1}
        })))
        .mount(&server)
        .await;
    server
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_list_logout() {
    let server = device().await;
    let port = server.address().port().to_string();
    let home = TempDir::new().unwrap();

    latchkey_cmd(home.path())
        .args(["login", "127.0.0.1", "--port", &port, "--auth-key", "k1"])
        .assert()
        .success()
        .stderr(predicate::str::contains(format!("Logged in to 127.0.0.1:{port}")));

    latchkey_cmd(home.path())
        .args(["login", "127.0.0.1", "--port", &port, "--auth-key", "k1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Already logged in"));

    latchkey_cmd(home.path())
        .args(["-o", "plain", "cards", "list"])
        .assert()
        .success()
        .stdout("1\n");

    latchkey_cmd(home.path())
        .args(["cards", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("00AF12").and(predicate::str::contains("Page 1/1")));

    latchkey_cmd(home.path())
        .args(["cards", "delete", "1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));

    latchkey_cmd(home.path())
        .arg("logout")
        .assert()
        .success()
        .stderr(predicate::str::contains("Logged out"));

    latchkey_cmd(home.path())
        .args(["cards", "list"])
        .assert()
        .code(3);

    // The connection outlives the session.
    latchkey_cmd(home.path())
        .args(["-o", "json", "status"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"authorized\": false")
                .and(predicate::str::contains("127.0.0.1")),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_key_leaves_session_logged_out() {
    let server = device().await;
    let port = server.address().port().to_string();
    let home = TempDir::new().unwrap();

    latchkey_cmd(home.path())
        .args(["login", "127.0.0.1", "--port", &port, "--auth-key", "wrong"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid"));

    latchkey_cmd(home.path())
        .args(["-o", "json", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"authorized\": false"));
}
