//! Integration tests for the allocations and rebalances commands.

use predicates::prelude::*;

use super::helpers::{
    autopilot_cmd_with_mock, mock_allocations, mock_graphql_error, start_mock_server, VAULT,
};

#[tokio::test]
async fn test_allocations_table_output() {
    let server = start_mock_server().await;
    mock_allocations(&server).await;

    autopilot_cmd_with_mock(&server)
        .args(["allocations", VAULT, "--asset-decimals", "6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Morpho YOG USDC"))
        .stdout(predicate::str::contains("60.00%"))
        .stdout(predicate::str::contains("Fluid USDC"))
        .stdout(predicate::str::contains("30.00%"))
        // The raw-asset buffer is never listed
        .stdout(predicate::str::contains("erc20").not());
}

#[tokio::test]
async fn test_allocations_json_output() {
    let server = start_mock_server().await;
    mock_allocations(&server).await;

    let output = autopilot_cmd_with_mock(&server)
        .args(["allocations", VAULT, "--asset-decimals", "6", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["current"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["current"][0]["name"], "Morpho YOG USDC");
    assert_eq!(json["time_series"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["rebalances"][0]["id"], 1);
}

#[tokio::test]
async fn test_rebalances_table_output() {
    let server = start_mock_server().await;
    mock_allocations(&server).await;

    autopilot_cmd_with_mock(&server)
        .args(["rebalances", VAULT, "--asset-decimals", "6"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Fluid USDC 75.00%, Morpho YOG USDC 25.00%",
        ));
}

#[tokio::test]
async fn test_allocations_graphql_error() {
    let server = start_mock_server().await;
    mock_graphql_error(&server, "Unknown vault").await;

    autopilot_cmd_with_mock(&server)
        .args(["allocations", VAULT])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown vault"));
}
