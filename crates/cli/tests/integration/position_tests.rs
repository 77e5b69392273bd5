//! Integration tests for the metrics and history commands.

use predicates::prelude::*;

use super::helpers::{
    autopilot_cmd_with_mock, mock_graphql_error, mock_position, start_mock_server, ACCOUNT,
    VAULT,
};

const DECIMALS: [&str; 4] = ["--share-decimals", "6", "--underlying-decimals", "8"];

#[tokio::test]
async fn test_metrics_table_output() {
    let server = start_mock_server().await;
    mock_position(&server).await;

    autopilot_cmd_with_mock(&server)
        .args(["metrics", VAULT, ACCOUNT, "--now", "400"])
        .args(DECIMALS)
        .assert()
        .success()
        .stdout(predicate::str::contains("Vault Position"))
        .stdout(predicate::str::contains("Current:          120 ($120.00)"))
        .stdout(predicate::str::contains("Total:            20 ($20.00)"))
        .stdout(predicate::str::contains("Harvests:         2"))
        .stdout(predicate::str::contains("Operating since:  1970-01-01"));
}

#[tokio::test]
async fn test_metrics_json_output() {
    let server = start_mock_server().await;
    mock_position(&server).await;

    let output = autopilot_cmd_with_mock(&server)
        .args(["metrics", VAULT, ACCOUNT, "--now", "400", "--format", "json"])
        .args(DECIMALS)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["harvest_count"], 2);
    assert_eq!(json["events"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["latest_update"], "1m");
    assert!(json["error"].is_null());
}

#[tokio::test]
async fn test_metrics_graphql_error() {
    let server = start_mock_server().await;
    mock_graphql_error(&server, "indexer unavailable").await;

    autopilot_cmd_with_mock(&server)
        .args(["metrics", VAULT, ACCOUNT, "--now", "400"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Unavailable"))
        .stderr(predicate::str::contains("metrics unavailable"))
        .stderr(predicate::str::contains("indexer unavailable"));
}

#[tokio::test]
async fn test_history_table_output() {
    let server = start_mock_server().await;
    mock_position(&server).await;

    autopilot_cmd_with_mock(&server)
        .args(["history", VAULT, ACCOUNT, "--now", "400"])
        .args(DECIMALS)
        .assert()
        .success()
        .stdout(predicate::str::contains("Harvest"))
        .stdout(predicate::str::contains("Convert"))
        .stdout(predicate::str::contains("0xaaa1"));
}

#[tokio::test]
async fn test_history_json_with_limit() {
    let server = start_mock_server().await;
    mock_position(&server).await;

    let output = autopilot_cmd_with_mock(&server)
        .args(["history", VAULT, ACCOUNT, "--format", "json", "-n", "1"])
        .args(DECIMALS)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let events = json.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["event"], "Harvest");
    assert_eq!(events[0]["timestamp"], 300);
}

#[tokio::test]
async fn test_history_invalid_address() {
    let server = start_mock_server().await;

    autopilot_cmd_with_mock(&server)
        .args(["history", "0x1234", ACCOUNT])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid address"));
}
