//! Failure paths: exit codes, messages and suggestions.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn template(root: &Path) {
    let dir = root.join("dilu");
    fs::create_dir_all(dir.join("app")).unwrap();
    fs::write(dir.join("go.mod"), "module dilu\n\ngo 1.21\n").unwrap();
    fs::write(dir.join("app/router.go"), "package app\n").unwrap();
}

fn kiln(root: &Path) -> Command {
    let home = root.join("home");
    let mut cmd = cargo_bin_cmd!("kiln");
    cmd.current_dir(root)
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("KILN_CONFIG");
    cmd
}

fn new_shop(root: &Path) -> Command {
    let mut cmd = kiln(root);
    cmd.args(["new", "shop", "-y", "-o"])
        .arg(root.join("out"))
        .arg("--source-dir")
        .arg(root.join("dilu"));
    cmd
}

#[test]
fn existing_project_is_a_user_error() {
    let tmp = TempDir::new().unwrap();
    template(tmp.path());
    fs::create_dir_all(tmp.path().join("out/shop")).unwrap();
    fs::write(tmp.path().join("out/shop/keep.txt"), "mine").unwrap();

    new_shop(tmp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("Suggestions:"));

    // Nothing of the existing directory was touched.
    assert_eq!(
        fs::read_to_string(tmp.path().join("out/shop/keep.txt")).unwrap(),
        "mine"
    );
    assert!(!tmp.path().join("out/shop/go.mod").exists());
}

#[test]
fn invalid_project_name() {
    let tmp = TempDir::new().unwrap();

    kiln(tmp.path())
        .args(["new", ".hidden", "-y"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid project name"));

    kiln(tmp.path())
        .args(["new", "my shop", "-y"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("whitespace"));
}

#[test]
fn missing_source_directory_is_not_found() {
    let tmp = TempDir::new().unwrap();

    kiln(tmp.path())
        .args(["new", "shop", "-y", "--source-dir", "nowhere"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Template directory not found"))
        .stderr(predicate::str::contains("--source-dir"));
}

#[test]
fn broken_profile_is_a_configuration_error() {
    let tmp = TempDir::new().unwrap();
    template(tmp.path());
    fs::write(tmp.path().join("profile.toml"), "[rules]\ntype_prefx = \"Gin\"\n").unwrap();

    new_shop(tmp.path())
        .arg("--profile")
        .arg(tmp.path().join("profile.toml"))
        .assert()
        .code(4)
        .stderr(predicate::str::contains("profile"));

    assert!(!tmp.path().join("out/shop").exists());
}

#[test]
fn missing_config_file_is_a_configuration_error() {
    let tmp = TempDir::new().unwrap();

    kiln(tmp.path())
        .args(["--config", "absent.toml", "rules"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn unknown_config_key() {
    let tmp = TempDir::new().unwrap();

    kiln(tmp.path())
        .args(["config", "get", "defaults.lang"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown config key 'defaults.lang'"))
        .stderr(predicate::str::contains("kiln config list"));
}

#[test]
fn missing_git_leaves_no_directories() {
    let tmp = TempDir::new().unwrap();

    kiln(tmp.path())
        .env("PATH", "")
        .args(["new", "shop", "-y", "-o"])
        .arg(tmp.path().join("out"))
        .assert()
        .code(4)
        .stderr(predicate::str::contains("unavailable"));

    assert!(!tmp.path().join("out/shop").exists());
}

#[test]
fn json_errors_on_stderr() {
    let tmp = TempDir::new().unwrap();
    template(tmp.path());
    fs::create_dir_all(tmp.path().join("out/shop")).unwrap();

    let assert = new_shop(tmp.path())
        .args(["--output-format", "json"])
        .assert()
        .code(2);

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    let line = stderr
        .lines()
        .find(|l| l.contains("\"exit_code\""))
        .expect("a JSON error document");
    let error: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(error["exit_code"], 2);
    assert!(error["error"].as_str().unwrap().contains("already exists"));
}

#[test]
fn unknown_rule_version_is_rejected_by_clap() {
    let tmp = TempDir::new().unwrap();

    kiln(tmp.path())
        .args(["new", "shop", "--rules", "v3"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("v3"));
}
