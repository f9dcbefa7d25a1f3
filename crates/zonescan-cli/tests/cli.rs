use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const CONFIG: &str = r#"{
    "SESReturnToAddr": "noreply@example.com",
    "Alerts": [
        {
            "Title": "stale",
            "CFApiToken": "token",
            "CFZoneNames": ["example.com"],
            "CFContainsStrings": ["staging"],
            "SESSubjectText": "Stale DNS records",
            "RecipientEmails": ["ops@example.com"]
        },
        {
            "Title": "no token",
            "CFApiToken": "",
            "CFZoneNames": ["example.org"],
            "CFContainsStrings": ["old"],
            "SESSubjectText": "Old DNS records",
            "RecipientEmails": ["ops@example.com"]
        }
    ]
}"#;

fn zonescan() -> Command {
    let mut cmd = Command::cargo_bin("zonescan").unwrap();
    cmd.env_clear();
    cmd
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn help_lists_subcommands() {
    zonescan()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn missing_source_is_an_error() {
    zonescan()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration source required"));
}

#[test]
fn check_reports_invalid_alerts() {
    let file = config_file(CONFIG);
    zonescan()
        .arg("--config")
        .arg(file.path())
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains("stale"))
        .stdout(predicate::str::contains("credential"))
        .stderr(predicate::str::contains("1 of 2 alerts failed validation"));
}

#[test]
fn check_uses_environment_fallback() {
    let file = config_file(CONFIG);
    zonescan()
        .env("CF_API_TOKEN", "from-env")
        .arg("--config")
        .arg(file.path())
        .arg("check")
        .args(["--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"valid\": true"))
        .stdout(predicate::str::contains("\"valid\": false").not());
}

#[test]
fn env_config_builds_single_alert() {
    zonescan()
        .env("ALERT_TITLE", "legacy")
        .env("CF_API_TOKEN", "token")
        .env("CF_ZONE_NAMES", "example.com")
        .env("CF_CONTAINS_STRINGS", "staging")
        .env("RECIPIENT_EMAILS", "ops@example.com")
        .env("SES_RETURN_TO_ADDR", "noreply@example.com")
        .env("SES_SUBJECT_TEXT", "Stale DNS records")
        .args(["--env-config", "check", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"legacy\""));
}

#[test]
fn unreadable_config_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    zonescan()
        .arg("--config")
        .arg(dir.path().join("absent.json"))
        .args(["run", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load scanner configuration"));
}

#[test]
fn malformed_config_fails_the_run() {
    let file = config_file(r#"{ "Alerts": "not a list" }"#);
    zonescan()
        .arg("--config")
        .arg(file.path())
        .args(["run", "--dry-run"])
        .assert()
        .failure();
}
