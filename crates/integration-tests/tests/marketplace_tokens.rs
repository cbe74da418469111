//! Integration tests for marketplace API token storage.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p sellerdesk-api)
//!
//! Run with: cargo test -p sellerdesk-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use sellerdesk_integration_tests::{base_url, client, db_pool, register_owner};

// ============================================================================
// CRUD & Masking Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_token_stored_masked() {
    let owner_client = client();
    let pool = db_pool().await;
    let base_url = base_url();

    let owner = register_owner(&owner_client, &pool).await;
    let store_id = owner.store_id;
    let secret = "ozon-api-key-1234567890";

    let resp = owner_client
        .post(format!("{base_url}/api/stores/{store_id}/marketplace-tokens"))
        .json(&json!({"marketplace": "ozon", "token": secret}))
        .send()
        .await
        .expect("Failed to store token");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse response");
    let preview = body
        .get("token_preview")
        .and_then(Value::as_str)
        .expect("token_preview missing");
    assert!(preview.starts_with("ozon"));
    assert!(preview.ends_with("7890"));
    assert_eq!(preview.len(), secret.len());
    // The plaintext never appears anywhere in the response.
    let raw = serde_json::to_string(&body).expect("Failed to serialize");
    assert!(!raw.contains(secret));

    // Nor in the listing or detail views.
    let resp = owner_client
        .get(format!("{base_url}/api/stores/{store_id}/marketplace-tokens"))
        .send()
        .await
        .expect("Failed to list tokens");
    assert_eq!(resp.status(), StatusCode::OK);
    let raw = resp.text().await.expect("Failed to read body");
    assert!(!raw.contains(secret));

    let resp = owner_client
        .get(format!(
            "{base_url}/api/stores/{store_id}/marketplace-tokens/ozon"
        ))
        .send()
        .await
        .expect("Failed to fetch token");
    assert_eq!(resp.status(), StatusCode::OK);
    let raw = resp.text().await.expect("Failed to read body");
    assert!(!raw.contains(secret));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_short_secret_fully_masked() {
    let owner_client = client();
    let pool = db_pool().await;
    let base_url = base_url();

    let owner = register_owner(&owner_client, &pool).await;
    let store_id = owner.store_id;

    let resp = owner_client
        .post(format!("{base_url}/api/stores/{store_id}/marketplace-tokens"))
        .json(&json!({"marketplace": "wildberries", "token": "abc12345"}))
        .send()
        .await
        .expect("Failed to store token");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(
        body.get("token_preview").and_then(Value::as_str),
        Some("********")
    );
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_duplicate_pair_conflict() {
    let owner_client = client();
    let pool = db_pool().await;
    let base_url = base_url();

    let owner = register_owner(&owner_client, &pool).await;
    let store_id = owner.store_id;

    let resp = owner_client
        .post(format!("{base_url}/api/stores/{store_id}/marketplace-tokens"))
        .json(&json!({"marketplace": "ozon", "token": "first-secret-value"}))
        .send()
        .await
        .expect("Failed to store token");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // A second token for the same pair must fail, not overwrite.
    let resp = owner_client
        .post(format!("{base_url}/api/stores/{store_id}/marketplace-tokens"))
        .json(&json!({"marketplace": "ozon", "token": "second-secret-value"}))
        .send()
        .await
        .expect("Failed to store duplicate token");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // The stored secret is unchanged.
    let resp = owner_client
        .get(format!(
            "{base_url}/api/stores/{store_id}/marketplace-tokens/ozon"
        ))
        .send()
        .await
        .expect("Failed to fetch token");
    let body: Value = resp.json().await.expect("Failed to parse response");
    let preview = body
        .get("token_preview")
        .and_then(Value::as_str)
        .expect("token_preview missing");
    assert!(preview.starts_with("firs"));
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_update_and_delete_token() {
    let owner_client = client();
    let pool = db_pool().await;
    let base_url = base_url();

    let owner = register_owner(&owner_client, &pool).await;
    let store_id = owner.store_id;

    let resp = owner_client
        .post(format!("{base_url}/api/stores/{store_id}/marketplace-tokens"))
        .json(&json!({"marketplace": "yandex_market", "token": "original-secret-value"}))
        .send()
        .await
        .expect("Failed to store token");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = owner_client
        .put(format!(
            "{base_url}/api/stores/{store_id}/marketplace-tokens/yandex_market"
        ))
        .json(&json!({"token": "replacement-secret-value"}))
        .send()
        .await
        .expect("Failed to update token");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert!(
        body.get("token_preview")
            .and_then(Value::as_str)
            .is_some_and(|p| p.starts_with("repl"))
    );

    let resp = owner_client
        .delete(format!(
            "{base_url}/api/stores/{store_id}/marketplace-tokens/yandex_market"
        ))
        .send()
        .await
        .expect("Failed to delete token");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = owner_client
        .get(format!(
            "{base_url}/api/stores/{store_id}/marketplace-tokens/yandex_market"
        ))
        .send()
        .await
        .expect("Failed to fetch deleted token");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Validation & Authorization Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_unknown_marketplace_rejected() {
    let owner_client = client();
    let pool = db_pool().await;
    let base_url = base_url();

    let owner = register_owner(&owner_client, &pool).await;
    let store_id = owner.store_id;

    let resp = owner_client
        .post(format!("{base_url}/api/stores/{store_id}/marketplace-tokens"))
        .json(&json!({"marketplace": "amazon", "token": "some-secret-value"}))
        .send()
        .await
        .expect("Failed to send token");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = owner_client
        .post(format!("{base_url}/api/stores/{store_id}/marketplace-tokens"))
        .json(&json!({"marketplace": "ozon", "token": ""}))
        .send()
        .await
        .expect("Failed to send empty token");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_foreign_store_denied() {
    let client_a = client();
    let client_b = client();
    let pool = db_pool().await;
    let base_url = base_url();

    let owner_a = register_owner(&client_a, &pool).await;
    register_owner(&client_b, &pool).await;

    let resp = client_b
        .post(format!(
            "{base_url}/api/stores/{}/marketplace-tokens",
            owner_a.store_id
        ))
        .json(&json!({"marketplace": "ozon", "token": "intruder-secret-value"}))
        .send()
        .await
        .expect("Failed to send token");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client_b
        .get(format!(
            "{base_url}/api/stores/{}/marketplace-tokens",
            owner_a.store_id
        ))
        .send()
        .await
        .expect("Failed to list tokens");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
