// tests/binary.rs

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// The binary with its configuration redirected into a temporary directory.
fn evrythng(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("evrythng").unwrap();
    cmd.env("EVRYTHNG_CONFIG", dir.path().join("config.toml"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_no_arguments_prints_help() {
    let dir = TempDir::new().unwrap();
    evrythng(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("RESOURCES"))
        .stdout(predicate::str::contains("--per-page <count>"));
}

#[test]
fn test_first_run_creates_config_file() {
    let dir = TempDir::new().unwrap();
    evrythng(&dir).arg("--help").assert().success();
    let written = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(written.contains("[regions]"));
}

#[test]
fn test_unknown_command_prints_help_and_succeeds() {
    let dir = TempDir::new().unwrap();
    evrythng(&dir)
        .arg("gadgets")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown command 'gadgets'."))
        .stdout(predicate::str::contains("USAGE"));
}

#[test]
fn test_syntax_error_prints_usage_and_succeeds() {
    let dir = TempDir::new().unwrap();
    evrythng(&dir)
        .args(["thngs", "frobnicate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("evrythng thngs|t $id read (r)"));
}

#[test]
fn test_bogus_flag_fails() {
    let dir = TempDir::new().unwrap();
    evrythng(&dir)
        .args(["thngs", "list", "--bogus-flag"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid switch: --bogus-flag"));
}

#[test]
fn test_options_are_persisted() {
    let dir = TempDir::new().unwrap();
    evrythng(&dir).args(["options", "showHttp", "true"]).assert().success();
    evrythng(&dir)
        .args(["options", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("showHttp: true"));
}
