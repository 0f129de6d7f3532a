//
//  basecamp-cli
//  tests/cli.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `bcx` isolated from the user's configuration, keyring and environment.
fn bcx(config_dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("bcx");
    cmd.env("BCX_CONFIG", config_dir.join("config.toml"))
        .env_remove("BCX_PROFILE")
        .env_remove("BCX_TOKEN")
        .env_remove("BCX_API_KEY")
        .env_remove("BCX_EMAIL")
        .env_remove("BCX_ACCOUNT_ID")
        .env_remove("BCX_BASE_URI")
        .env_remove("BCX_DEBUG");
    cmd
}

// ============================================================================
// Help and Version
// ============================================================================

#[test]
fn test_version_command() {
    let dir = TempDir::new().unwrap();
    bcx(dir.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bcx version"));
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    bcx(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Basecamp"))
        .stdout(predicate::str::contains("api"))
        .stdout(predicate::str::contains("auth"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_completion_bash() {
    let dir = TempDir::new().unwrap();
    bcx(dir.path())
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bcx"));
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_config_set_get_round_trip() {
    let dir = TempDir::new().unwrap();

    bcx(dir.path())
        .args(["config", "set", "account_id", "999"])
        .assert()
        .success();

    bcx(dir.path())
        .args(["config", "get", "profiles.default.account_id"])
        .assert()
        .success()
        .stdout("999\n");

    bcx(dir.path())
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("profiles.default.account_id"));

    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_config_path_honours_env() {
    let dir = TempDir::new().unwrap();
    bcx(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_rejects_invalid_value() {
    let dir = TempDir::new().unwrap();
    bcx(dir.path())
        .args(["config", "set", "api_version", "v9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown API version"));
}

// ============================================================================
// Api
// ============================================================================

#[test]
fn test_api_unsupported_method() {
    let dir = TempDir::new().unwrap();
    bcx(dir.path())
        .args(["api", "projects", "-X", "PATCH"])
        .env("BCX_TOKEN", "t0ken")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unsupported HTTP method"));
}

#[test]
fn test_api_missing_account() {
    let dir = TempDir::new().unwrap();
    bcx(dir.path())
        .args(["api", "projects"])
        .env("BCX_TOKEN", "t0ken")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("requires an account id"));
}

#[test]
fn test_api_get_prints_body() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/projects.json")
        .match_query(mockito::Matcher::UrlEncoded(
            "status".to_string(),
            "archived".to_string(),
        ))
        .match_header("authorization", "Bearer t0ken")
        .with_status(200)
        .with_body(r#"[{"id":42,"name":"Launch"}]"#)
        .create();

    bcx(dir.path())
        .args(["api", "projects", "-F", "status=archived", "--json"])
        .env("BCX_TOKEN", "t0ken")
        .env("BCX_BASE_URI", server.url())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""name":"Launch""#));

    mock.assert();
}

#[test]
fn test_api_not_found_exit_code() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/projects/1.json")
        .with_status(404)
        .with_body(r#"{"error":"not found"}"#)
        .create();

    bcx(dir.path())
        .args(["api", "projects/1", "--include"])
        .env("BCX_TOKEN", "t0ken")
        .env("BCX_BASE_URI", server.url())
        .assert()
        .code(8)
        .stdout(predicate::str::contains("404"))
        .stderr(predicate::str::contains("Status: 404"));
}

#[test]
fn test_api_without_credentials_points_to_login() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[profiles.default]\nauth = \"api_key\"\naccount_id = \"999\"\n",
    )
    .unwrap();

    bcx(dir.path())
        .args(["api", "projects"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no email"));
}
