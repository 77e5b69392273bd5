//! CLI argument validation tests.
//!
//! These tests verify that the CLI properly validates arguments and provides
//! helpful error messages without requiring network access.

use predicates::prelude::*;

use super::helpers::{autopilot_cmd, ACCOUNT, VAULT};

#[test]
fn test_help_output() {
    autopilot_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("autopilot"))
        .stdout(predicate::str::contains("metrics"))
        .stdout(predicate::str::contains("history"))
        .stdout(predicate::str::contains("allocations"))
        .stdout(predicate::str::contains("rebalances"));
}

#[test]
fn test_metrics_help_output() {
    autopilot_cmd()
        .args(["metrics", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--share-decimals"))
        .stdout(predicate::str::contains("--value-decimals"))
        .stdout(predicate::str::contains("--now"));
}

#[test]
fn test_invalid_command() {
    autopilot_cmd()
        .arg("invalid_command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_metrics_missing_account() {
    autopilot_cmd()
        .args(["metrics", VAULT])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_allocations_missing_vault() {
    autopilot_cmd()
        .args(["allocations"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_invalid_format_value() {
    autopilot_cmd()
        .args(["metrics", VAULT, ACCOUNT, "--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_invalid_decimals_value() {
    autopilot_cmd()
        .args(["metrics", VAULT, ACCOUNT, "--share-decimals", "many"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_invalid_api_url() {
    autopilot_cmd()
        .args(["allocations", VAULT, "--api-url", "not a url"])
        .assert()
        .failure();
}
