//! Integration tests for the `airq` CLI binary.
//!
//! Argument parsing, guards, and exit codes run without a backend; the
//! data path runs against a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `airq` binary with env isolation.
///
/// Clears all `AIRQ_*` env vars and points config and session storage
/// into `home` so tests never touch the user's real files.
fn airq_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("airq");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("AIRQ_CONFIG", home.join("airq.toml"))
        .env("AIRQ_SESSION_DIR", home.join("session"))
        .env("NO_COLOR", "1")
        .env_remove("AIRQ_API_URL")
        .env_remove("AIRQ_OUTPUT")
        .env_remove("AIRQ_INSECURE")
        .env_remove("AIRQ_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Persist a session the way a previous `airq login` would have.
fn write_session(home: &Path, token: &str, role: &str) {
    let dir = home.join("session");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("token"), token).unwrap();
    let user = json!({ "id": "u-1", "email": "ana@example.org", "name": "Ana", "role": role });
    std::fs::write(dir.join("user.json"), user.to_string()).unwrap();
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
    let output = airq_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    airq_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("login")
                .and(predicate::str::contains("sensors"))
                .and(predicate::str::contains("subscriptions"))
                .and(predicate::str::contains("requests")),
        );
}

#[test]
fn test_version() {
    let home = TempDir::new().unwrap();
    airq_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("airq"));
}

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    airq_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("airq"));
}

#[test]
fn test_config_path_honors_env() {
    let home = TempDir::new().unwrap();
    airq_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("airq.toml"));
}

#[test]
fn test_config_init_writes_file() {
    let home = TempDir::new().unwrap();
    airq_cmd(home.path())
        .args(["config", "init", "--api-url", "https://aq.example.org/api"])
        .assert()
        .success();
    let written = std::fs::read_to_string(home.path().join("airq.toml")).unwrap();
    assert!(written.contains("https://aq.example.org/api"));
}

// ── Guards ──────────────────────────────────────────────────────────

#[test]
fn test_whoami_logged_out_exits_auth() {
    let home = TempDir::new().unwrap();
    airq_cmd(home.path())
        .arg("whoami")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_sensors_list_logged_out_exits_auth() {
    let home = TempDir::new().unwrap();
    airq_cmd(home.path())
        .args(["sensors", "list"])
        .assert()
        .code(3);
}

#[test]
fn test_whoami_reads_persisted_session() {
    let home = TempDir::new().unwrap();
    write_session(home.path(), "tok-1", "VIEWER");
    airq_cmd(home.path())
        .args(["whoami", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("u-1"));
}

#[test]
fn test_users_list_as_viewer_is_forbidden() {
    let home = TempDir::new().unwrap();
    write_session(home.path(), "tok-1", "VIEWER");
    airq_cmd(home.path())
        .args(["users", "list"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("ADMIN"));
}

#[test]
fn test_ephemeral_ignores_persisted_session() {
    let home = TempDir::new().unwrap();
    write_session(home.path(), "tok-1", "ADMIN");
    airq_cmd(home.path())
        .args(["--ephemeral", "whoami"])
        .assert()
        .code(3);
}

// ── Forms ───────────────────────────────────────────────────────────

#[test]
fn test_login_rejects_bad_email() {
    let home = TempDir::new().unwrap();
    airq_cmd(home.path())
        .args(["login", "--email", "bad", "--password-stdin"])
        .write_stdin("secret1\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Enter a valid email address"));
}

#[test]
fn test_logout_clears_session_files() {
    let home = TempDir::new().unwrap();
    write_session(home.path(), "tok-1", "VIEWER");
    airq_cmd(home.path()).arg("logout").assert().success();
    assert!(!home.path().join("session/token").exists());
    assert!(!home.path().join("session/user.json").exists());
}

// ── Against a backend ───────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_sensors_list_json_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sensors"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "s-1",
            "name": "Pier",
            "location": "Harbour",
            "latitude": 53.8,
            "longitude": -1.55,
            "status": "active",
            "aqi": 42
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    write_session(home.path(), "tok-1", "VIEWER");
    let api_url = format!("{}/api", server.uri());

    let output = airq_cmd(home.path())
        .args(["sensors", "list", "-o", "json", "--api-url", &api_url])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed[0]["name"], "Pier");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_token_logs_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/subscriptions"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    write_session(home.path(), "stale", "VIEWER");
    let api_url = format!("{}/api", server.uri());

    airq_cmd(home.path())
        .args(["subscriptions", "list", "--api-url", &api_url])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Your session has expired"));
    assert!(!home.path().join("session/token").exists());
}
