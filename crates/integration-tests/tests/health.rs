//! Liveness and readiness probes.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p sellerdesk-api)
//!
//! Run with: cargo test -p sellerdesk-integration-tests -- --ignored

use sellerdesk_integration_tests::{base_url, client};

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_health() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to reach health endpoint");

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.expect("Failed to read body"), "ok");
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_readiness() {
    let client = client();
    let base_url = base_url();

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to reach readiness endpoint");

    assert_eq!(resp.status(), 200);
}
