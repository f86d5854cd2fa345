use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn portico_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("portico"));
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

/// A URL nothing listens on, so fetches fail fast and offline.
fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}/_/")
}

fn write_config(dir: &TempDir, projects: &[&str], allow_other_project: bool) -> PathBuf {
    let mut body = String::from("projects:\n");
    for project in projects {
        body.push_str(&format!("  - {project}\n"));
    }
    body.push_str(&format!("allow_other_project: {allow_other_project}\n"));
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, body).expect("write config");
    path
}

// ---------------------------------------------------------------------------
// portico current
// ---------------------------------------------------------------------------

#[test]
fn current_defaults_to_first_project() {
    let home = TempDir::new().expect("home");
    let config = write_config(&home, &["https://api.test/_/", "https://staging.test/_/"], false);

    portico_cmd(home.path())
        .args(["current", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout("https://api.test/_/\n");
}

#[test]
fn current_uses_default_config_location() {
    let home = TempDir::new().expect("home");
    let dir = home.path().join(".portico");
    std::fs::create_dir_all(&dir).expect("mkdir");
    std::fs::write(dir.join("config.yaml"), "projects:\n  - https://api.test/_/\n")
        .expect("write");

    portico_cmd(home.path())
        .arg("current")
        .assert()
        .success()
        .stdout(contains("https://api.test/_/"));
}

#[test]
fn current_rejects_unlisted_request_with_warning() {
    let home = TempDir::new().expect("home");
    let config = write_config(&home, &["https://api.test/_/"], false);

    portico_cmd(home.path())
        .args(["current", "--config"])
        .arg(&config)
        .args(["--request-url", "https://admin.test/?project=https://evil.test/"])
        .assert()
        .success()
        .stdout(contains("No current project."))
        .stderr(contains("isn't allowed to be used by this application"));
}

#[test]
fn current_allows_any_project_when_enabled() {
    let home = TempDir::new().expect("home");
    let config = write_config(&home, &["https://api.test/_/"], true);

    let assert = portico_cmd(home.path())
        .args(["current", "--json", "--config"])
        .arg(&config)
        .args(["--request-url", "https://admin.test/?project=https%3A%2F%2Fother.test%2F"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    let json: Value = serde_json::from_str(&stdout).expect("json");
    assert_eq!(json["current"], "https://other.test/");
    assert_eq!(json["configured"], false);
    assert_eq!(json["rejected"], false);
}

#[test]
fn missing_config_fails_with_path() {
    let home = TempDir::new().expect("home");
    portico_cmd(home.path())
        .arg("current")
        .assert()
        .failure()
        .stderr(contains("config not found").and(contains("config.yaml")));
}

// ---------------------------------------------------------------------------
// portico projects
// ---------------------------------------------------------------------------

#[test]
fn projects_json_reports_failed_fetches() {
    let home = TempDir::new().expect("home");
    let first = dead_url();
    let second = dead_url();
    let config = write_config(&home, &[&first, &second], false);

    let assert = portico_cmd(home.path())
        .args(["projects", "--json", "--timeout", "5", "--config"])
        .arg(&config)
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    let json: Value = serde_json::from_str(&stdout).expect("json");

    assert_eq!(json["current"], first.as_str());
    let projects = json["projects"].as_array().expect("projects array");
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0]["url"], first.as_str());
    assert_eq!(projects[0]["current"], true);
    assert_eq!(projects[1]["url"], second.as_str());
    for project in projects {
        assert_eq!(project["status"], "failed");
        assert_eq!(project["loading"], false);
        assert_eq!(project["error"]["kind"], "network");
        assert!(project["project_name"].is_null());
    }
}

#[test]
fn projects_table_lists_every_url() {
    let home = TempDir::new().expect("home");
    let url = dead_url();
    let config = write_config(&home, &[&url], false);

    portico_cmd(home.path())
        .args(["projects", "--timeout", "5", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(contains(url.as_str()).and(contains("FAILED")).and(contains("1 failed")));
}

#[test]
fn projects_missing_config_fails_with_path() {
    let home = TempDir::new().expect("home");
    let missing = home.path().join("nowhere.yaml");
    portico_cmd(home.path())
        .args(["projects", "--config"])
        .arg(&missing)
        .assert()
        .failure()
        .stderr(contains("config not found").and(contains("nowhere.yaml")));
}

#[test]
fn projects_rejected_request_still_lists_projects() {
    let home = TempDir::new().expect("home");
    let url = dead_url();
    let config = write_config(&home, &[&url], false);

    portico_cmd(home.path())
        .args(["projects", "--timeout", "5", "--config"])
        .arg(&config)
        .args(["--request-url", "https://admin.test/?project=https://evil.test/"])
        .assert()
        .success()
        .stdout(contains(url.as_str()).and(contains("No current project.")))
        .stderr(contains("isn't allowed to be used by this application"));
}
