//! Integration tests for the `notifly` binary.
//!
//! Argument parsing, configuration errors and single-cycle runs against
//! a mocked controller. Nothing here touches a real controller or the
//! user's configuration.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

const FLAT_ENV: &[&str] = &[
    "CHECK_INTERVAL",
    "NOTIFICATION_SERVICES",
    "LOG_LEVEL",
    "LOG_FORMAT",
    "UNIFI_URL",
    "UNIFI_SITES",
    "UNIFI_USERNAME",
    "UNIFI_PASSWORD",
    "UNIFI_PLATFORM",
    "UNIFI_INSECURE",
    "UNIFI_CA_CERT",
    "UNIFI_TIMEOUT",
    "UNIFI_ADMIN_NAME",
    "UNIFI_PAGINATION",
    "SLACK_ALARMS_WEBHOOK",
    "SLACK_EVENTS_WEBHOOK",
    "NOTIFLY_CONFIG",
    "RUST_LOG",
];

/// The `notifly` binary with env isolation: no inherited settings and a
/// config directory that does not exist.
fn notifly_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("notifly");
    cmd.env("HOME", "/tmp/notifly-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/notifly-cli-test-nonexistent");
    for name in FLAT_ENV {
        cmd.env_remove(name);
    }
    cmd
}

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_usage() {
    let output = notifly_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    notifly_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("alarms and events")
            .and(predicate::str::contains("run"))
            .and(predicate::str::contains("once"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_version_flag() {
    notifly_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("notifly"));
}

#[test]
fn test_unknown_kind_is_a_usage_error() {
    notifly_cmd()
        .args(["once", "--kind", "devices"])
        .assert()
        .code(2);
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_config_prints_defaults_without_a_file() {
    notifly_cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("check_interval = 1")
                .and(predicate::str::contains(r#"platform = "classic""#)),
        );
}

#[test]
fn test_config_masks_secrets() {
    let file = config_file(
        r#"
        [unifi]
        password = "hunter2"

        [slack]
        alarms_webhook = "https://hooks.slack.com/services/T0/B0/secret"
        "#,
    );

    notifly_cmd()
        .arg("--config")
        .arg(file.path())
        .arg("config")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("hunter2")
                .not()
                .and(predicate::str::contains("hooks.slack.com").not())
                .and(predicate::str::contains("********")),
        );
}

#[test]
fn test_missing_settings_are_reported_together() {
    notifly_cmd()
        .arg("run")
        .env("UNIFI_URL", "https://unifi.local")
        .assert()
        .code(2)
        .stderr(
            predicate::str::contains("unifi.username is required")
                .and(predicate::str::contains("unifi.sites"))
                .and(predicate::str::contains("notification_services")),
        );
}

#[test]
fn test_explicit_missing_config_file() {
    notifly_cmd()
        .args(["--config", "/tmp/notifly-cli-test-nonexistent/none.toml", "run"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("config file not found"));
}

// ── Single cycle against a mocked controller ────────────────────────

fn controller_config(server: &MockServer) -> tempfile::NamedTempFile {
    config_file(&format!(
        r#"
        notification_services = ["log"]
        log_format = "pretty"

        [unifi]
        url = "{}"
        sites = ["default"]
        username = "admin"
        password = "secret"

        [retry]
        attempts = 1
        "#,
        server.uri()
    ))
}

#[tokio::test(flavor = "multi_thread")]
async fn test_once_reports_new_alarms() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "unifises=tok; Path=/")
                .set_body_json(json!({ "meta": { "rc": "ok" }, "data": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let recent = (chrono::Utc::now() - chrono::Duration::minutes(1)).to_rfc3339();
    Mock::given(method("POST"))
        .and(path("/api/s/default/stat/alarm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "ok" },
            "data": [{ "_id": "a1", "msg": "IPS Alert 1: port scan", "datetime": recent }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let file = controller_config(&server);
    notifly_cmd()
        .arg("--config")
        .arg(file.path())
        .args(["once", "--kind", "alarms", "--since-minutes", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("IPS Alert 1: port scan"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_once_rejected_login_exits_with_auth_code() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(400).set_body_string("api.err.Invalid"))
        .mount(&server)
        .await;

    let file = controller_config(&server);
    notifly_cmd()
        .arg("--config")
        .arg(file.path())
        .args(["once", "--kind", "events"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Authentication failed"));
}
