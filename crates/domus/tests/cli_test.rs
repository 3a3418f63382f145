//! Integration tests for the `domus` CLI binary.
//!
//! Each test gets its own config directory and uses the plaintext
//! preferences backend, so the user's keyring and config are never touched.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `domus` binary isolated under `home`.
fn domus_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("domus");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("DOMUS_STORAGE__BACKEND", "plaintext")
        .env("NO_COLOR", "1")
        .env_remove("DOMUS_OUTPUT")
        .env_remove("DOMUS_INSECURE")
        .env_remove("DOMUS_TIMEOUT")
        .env_remove("DOMUS_USERNAME")
        .env_remove("DOMUS_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = domus_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    domus_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("thermostats")
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("security")),
    );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    domus_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("domus"));
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    domus_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("domus"));
}

// ── Local validation ────────────────────────────────────────────────

#[test]
fn test_thermostat_target_out_of_range_is_a_usage_error() {
    let home = tempfile::tempdir().unwrap();
    let output = domus_cmd(home.path())
        .args(["thermostats", "set", "t1", "35"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("outside 16-30"), "unexpected output:\n{text}");
}

#[test]
fn test_zero_timeout_rejected() {
    let home = tempfile::tempdir().unwrap();
    domus_cmd(home.path())
        .args(["--timeout", "0", "config", "show"])
        .assert()
        .code(2);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_set_endpoint_persists_across_invocations() {
    let home = tempfile::tempdir().unwrap();

    domus_cmd(home.path())
        .args(["config", "set-endpoint", "10.0.0.7:5000"])
        .assert()
        .success()
        .stderr(predicate::str::contains("http://10.0.0.7:5000/"));

    domus_cmd(home.path())
        .args(["config", "get-endpoint"])
        .assert()
        .success()
        .stdout(predicate::str::diff("10.0.0.7:5000\n"));

    domus_cmd(home.path())
        .args(["config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"storage\": \"plaintext\"")
                .and(predicate::str::contains("\"base_url\": \"http://10.0.0.7:5000/\"")),
        );
}

#[test]
fn test_invalid_endpoint_is_rejected_and_not_stored() {
    let home = tempfile::tempdir().unwrap();

    domus_cmd(home.path())
        .args(["config", "set-endpoint", "   "])
        .assert()
        .failure();

    domus_cmd(home.path())
        .args(["config", "get-endpoint"])
        .assert()
        .success()
        .stdout(predicate::str::contains("192.168.1.100:5000"));
}

#[test]
fn test_config_path_ignores_broken_config() {
    let home = tempfile::tempdir().unwrap();
    let dir = home.path().join(".config").join("domus");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "this is = = not toml").unwrap();

    domus_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Against a mock server ───────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_login_session_is_reused_by_the_next_invocation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=tok-9; HttpOnly; Path=/")
                .set_body_json(json!({
                    "status": "success",
                    "data": { "user": { "id": 3, "name": "ola" } }
                })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/buttons"))
        .and(header("cookie", "session=tok-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": { "buttons": [
                { "id": 1, "name": "Lampa", "room": "Salon", "state": true },
                { "id": 2, "name": "Wentylator", "room": "Kuchnia", "state": false }
            ] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let uri = server.uri();

    domus_cmd(home.path())
        .args(["config", "set-endpoint", &uri])
        .assert()
        .success();

    domus_cmd(home.path())
        .args(["login", "-u", "ola", "--password", "sekret"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Logged in as ola"));

    let output = domus_cmd(home.path())
        .args(["devices", "list", "--room", "Salon", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let devices: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(devices.as_array().unwrap().len(), 1);
    assert_eq!(devices[0]["id"], "1");
    assert_eq!(devices[0]["state"], true);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unauthorized_maps_to_auth_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/temperature_controls"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "error",
            "message": "Nie zalogowano"
        })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    domus_cmd(home.path())
        .args(["config", "set-endpoint", &server.uri()])
        .assert()
        .success();

    let output = domus_cmd(home.path())
        .args(["thermostats", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    let text = combined_output(&output);
    assert!(text.contains("domus login"), "unexpected output:\n{text}");
}
