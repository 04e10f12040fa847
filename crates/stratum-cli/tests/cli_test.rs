//! End-to-end CLI tests against a sandbox home

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn stratum(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("stratum").expect("binary exists");
    cmd.env("STRATUM_HOME", home);
    cmd
}

#[test]
fn test_scan_commands_empty() {
    let home = TempDir::new().unwrap();
    stratum(home.path())
        .args(["scan", "commands"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No command entities found"));
}

#[test]
fn test_write_scan_toggle_delete_command() {
    let home = TempDir::new().unwrap();

    stratum(home.path())
        .args(["write", "commands", "review", "--content", "Review the diff"])
        .assert()
        .success();

    stratum(home.path())
        .args(["scan", "commands"])
        .assert()
        .success()
        .stdout(predicate::str::contains("review").and(predicate::str::contains("enabled")));

    stratum(home.path())
        .args(["toggle", "commands", "review", "--off"])
        .assert()
        .success();
    assert!(home
        .path()
        .join(".claude/commands/review.md.disabled")
        .exists());

    stratum(home.path())
        .args(["scan", "commands", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"state\": \"disabled\""));

    stratum(home.path())
        .args(["delete", "commands", "review"])
        .assert()
        .success();
    assert!(!home
        .path()
        .join(".claude/commands/review.md.disabled")
        .exists());
}

#[test]
fn test_toggle_direct_mcp_server() {
    let home = TempDir::new().unwrap();
    let claude_json = home.path().join(".claude.json");
    fs::write(
        &claude_json,
        json!({"mcpServers": {"search": {"command": "srv"}}}).to_string(),
    )
    .unwrap();

    stratum(home.path())
        .args(["toggle", "mcp", "search", "--off", "--direct"])
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&claude_json).unwrap()).unwrap();
    assert_eq!(value["disabledMcpServers"], json!(["search"]));

    stratum(home.path())
        .args(["scan", "mcp", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"state\": \"disabled\""));
}

#[test]
fn test_toggle_missing_entity_fails() {
    let home = TempDir::new().unwrap();
    stratum(home.path())
        .args(["toggle", "commands", "ghost", "--off"])
        .assert()
        .failure();
}

#[test]
fn test_profile_lifecycle() {
    let home = TempDir::new().unwrap();
    let live = home.path().join(".claude/settings.json");
    fs::create_dir_all(live.parent().unwrap()).unwrap();
    let original = r#"{"env":{"API":"original"}}"#;
    fs::write(&live, original).unwrap();

    stratum(home.path())
        .args([
            "profile",
            "create",
            "Work",
            "--settings",
            r#"{"env":{"API":"work"}}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created profile"));

    // Find the id from the list output.
    let output = stratum(home.path())
        .args(["profile", "list", "--json"])
        .output()
        .unwrap();
    let profiles: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let id = profiles[0]["id"].as_str().unwrap().to_string();

    stratum(home.path())
        .args(["profile", "use", &id])
        .assert()
        .success();

    let live_value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&live).unwrap()).unwrap();
    assert_eq!(live_value, json!({"env": {"API": "work"}}));

    stratum(home.path())
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(active)"));

    stratum(home.path())
        .args(["profile", "restore"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&live).unwrap(), original);
}

#[test]
fn test_delete_active_profile_restores_original() {
    let home = TempDir::new().unwrap();
    let live = home.path().join(".claude/settings.json");
    fs::create_dir_all(live.parent().unwrap()).unwrap();
    let original = r#"{"model":"opus"}"#;
    fs::write(&live, original).unwrap();

    stratum(home.path())
        .args(["profile", "create", "Work", "--settings", r#"{"model":"sonnet"}"#])
        .assert()
        .success();

    let output = stratum(home.path())
        .args(["profile", "list", "--json"])
        .output()
        .unwrap();
    let profiles: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let id = profiles[0]["id"].as_str().unwrap().to_string();

    stratum(home.path())
        .args(["profile", "use", &id])
        .assert()
        .success();
    stratum(home.path())
        .args(["profile", "delete", &id])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&live).unwrap(), original);
    stratum(home.path())
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No profiles"));
}

#[test]
fn test_unknown_profile_id_fails() {
    let home = TempDir::new().unwrap();
    stratum(home.path())
        .args(["profile", "use", "00000000-0000-0000-0000-000000000000"])
        .assert()
        .failure();
}

#[test]
fn test_marketplace_resolve_not_installed() {
    let home = TempDir::new().unwrap();
    stratum(home.path())
        .args(["marketplace", "resolve", "https://github.com/acme/toolkit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not installed"));
}

#[test]
fn test_marketplace_resolve_installed() {
    let home = TempDir::new().unwrap();
    let known = home.path().join(".claude/plugins/known_marketplaces.json");
    fs::create_dir_all(known.parent().unwrap()).unwrap();
    fs::write(
        &known,
        json!({
            "official": {
                "source": {"source": "github", "repo": "acme/toolkit"},
                "installLocation": "/tmp/x",
            }
        })
        .to_string(),
    )
    .unwrap();

    stratum(home.path())
        .args(["marketplace", "resolve", "https://github.com/acme/toolkit.git"])
        .assert()
        .success()
        .stdout(predicate::str::contains("installed via 'official'"));
}
