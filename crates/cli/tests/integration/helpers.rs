//! Test helper utilities for CLI integration tests.

#![allow(deprecated)] // Command::cargo_bin deprecation

use assert_cmd::Command;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const VAULT: &str = "0x1111111111111111111111111111111111111111";
pub const ACCOUNT: &str = "0x2222222222222222222222222222222222222222";

/// Start a mock GraphQL server.
pub async fn start_mock_server() -> MockServer {
    MockServer::start().await
}

/// Create a CLI command pointing to a mock server.
pub fn autopilot_cmd_with_mock(mock: &MockServer) -> Command {
    let mut cmd = autopilot_cmd();
    cmd.env("AUTOPILOT_API_URL", mock.uri());
    cmd
}

/// Create a CLI command without mock server (for validation tests).
pub fn autopilot_cmd() -> Command {
    let mut cmd = Command::cargo_bin("autopilot").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Load a fixture file as a string.
pub fn load_fixture(name: &str) -> String {
    let path = format!(
        "{}/tests/fixtures/{}.json",
        env!("CARGO_MANIFEST_DIR"),
        name
    );
    std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to load fixture: {}", path))
}

/// Mock the response to one query, selected by its root field name.
pub async fn mock_query_response(server: &MockServer, root_field: &str, fixture_name: &str) {
    let body = load_fixture(fixture_name);
    Mock::given(method("POST"))
        .and(body_string_contains(root_field))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mock the vault and user history queries.
pub async fn mock_position(server: &MockServer) {
    mock_query_response(server, "vaultHistories", "vault_history").await;
    mock_query_response(server, "userBalanceHistories", "user_history").await;
}

/// Mock the allocation metadata and snapshot queries.
pub async fn mock_allocations(server: &MockServer) {
    mock_query_response(server, "allocationPoints", "allocation_points").await;
    mock_query_response(server, "allocationSnapshots", "allocation_snapshots").await;
}

/// Mock a GraphQL error response.
pub async fn mock_graphql_error(server: &MockServer, error_message: &str) {
    let body = format!(
        r#"{{"errors":[{{"message":"{}"}}],"data":null}}"#,
        error_message
    );
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}
