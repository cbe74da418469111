//! Integration tests for external question ingestion and conversation views.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p sellerdesk-api)
//! - `SELLERDESK_EXTERNAL_API_SECRET` matching the server's value
//!
//! Run with: cargo test -p sellerdesk-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use sellerdesk_integration_tests::{
    API_SECRET_HEADER, base_url, client, create_product, db_pool, external_api_secret,
    register_owner, unique,
};

/// Ingest a question from an external buyer, asserting success.
async fn ingest_question(external_id: &str, product_id: i32, text: &str) -> i64 {
    let anon = client();
    let base_url = base_url();

    let resp = anon
        .post(format!("{base_url}/api/external/questions"))
        .header(API_SECRET_HEADER, external_api_secret())
        .json(&json!({
            "external_id": external_id,
            "product": product_id,
            "text": text,
        }))
        .send()
        .await
        .expect("Failed to ingest question");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse response");
    body.get("question_id")
        .and_then(Value::as_i64)
        .expect("question_id missing")
}

// ============================================================================
// Ingestion Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_ingestion_requires_credentials() {
    let anon = client();
    let base_url = base_url();

    let resp = anon
        .post(format!("{base_url}/api/external/questions"))
        .json(&json!({"external_id": "buyer-1", "product": 1, "text": "Hi"}))
        .send()
        .await
        .expect("Failed to send question");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = anon
        .post(format!("{base_url}/api/external/questions"))
        .header(API_SECRET_HEADER, "not-the-configured-secret")
        .json(&json!({"external_id": "buyer-1", "product": 1, "text": "Hi"}))
        .send()
        .await
        .expect("Failed to send question");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_ingestion_missing_fields() {
    let owner_client = client();
    let anon = client();
    let pool = db_pool().await;
    let base_url = base_url();

    register_owner(&owner_client, &pool).await;
    let product_id = create_product(&owner_client, &unique("product")).await;

    // Each required field missing in turn, all with valid credentials.
    for payload in [
        json!({"product": product_id, "text": "Hi"}),
        json!({"external_id": "buyer-1", "text": "Hi"}),
        json!({"external_id": "buyer-1", "product": product_id}),
        json!({"external_id": "", "product": product_id, "text": "Hi"}),
        json!({"external_id": "buyer-1", "product": product_id, "text": ""}),
    ] {
        let resp = anon
            .post(format!("{base_url}/api/external/questions"))
            .header(API_SECRET_HEADER, external_api_secret())
            .json(&payload)
            .send()
            .await
            .expect("Failed to send question");
        assert_eq!(
            resp.status(),
            StatusCode::BAD_REQUEST,
            "payload should be rejected: {payload}"
        );
    }
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_ingestion_unknown_product() {
    let anon = client();
    let base_url = base_url();

    let resp = anon
        .post(format!("{base_url}/api/external/questions"))
        .header(API_SECRET_HEADER, external_api_secret())
        .json(&json!({
            "external_id": "buyer-1",
            "product": 999_999_999,
            "text": "Is this available?",
        }))
        .send()
        .await
        .expect("Failed to send question");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_ingestion_reuses_external_identity() {
    let owner_client = client();
    let pool = db_pool().await;

    register_owner(&owner_client, &pool).await;
    let product_id = create_product(&owner_client, &unique("product")).await;

    let external_id = unique("buyer");
    ingest_question(&external_id, product_id, "First question").await;
    ingest_question(&external_id, product_id, "Second question").await;

    // Both questions hang off one materialized buyer account.
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE external_id = $1")
        .bind(&external_id)
        .fetch_one(&pool)
        .await
        .expect("Failed to count users");
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_ingestion_tolerates_marketplace_spelling() {
    let owner_client = client();
    let pool = db_pool().await;
    let base_url = base_url();
    let anon = client();

    register_owner(&owner_client, &pool).await;
    let product_id = create_product(&owner_client, &unique("product")).await;

    // A sloppy marketplace name is normalized rather than rejected.
    let resp = anon
        .post(format!("{base_url}/api/external/questions"))
        .header(API_SECRET_HEADER, external_api_secret())
        .json(&json!({
            "external_id": unique("buyer"),
            "product": product_id,
            "text": "Shipping time?",
            "marketplace": "Yandex Market",
        }))
        .send()
        .await
        .expect("Failed to ingest question");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse response");
    let question_id = body
        .get("question_id")
        .and_then(Value::as_i64)
        .expect("question_id missing");

    let resp = owner_client
        .get(format!("{base_url}/api/questions/{question_id}"))
        .send()
        .await
        .expect("Failed to fetch question");
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(
        body.get("marketplace").and_then(Value::as_str),
        Some("yandex_market")
    );
}

// ============================================================================
// Conversation View Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_conversations_by_external_id() {
    let owner_client = client();
    let anon = client();
    let pool = db_pool().await;
    let base_url = base_url();

    register_owner(&owner_client, &pool).await;
    let product_id = create_product(&owner_client, &unique("product")).await;

    let external_id = unique("buyer");
    let question_id = ingest_question(&external_id, product_id, "What about sizing?").await;

    // Staff replies show up inside the thread.
    let resp = owner_client
        .post(format!("{base_url}/api/messages"))
        .json(&json!({"question": question_id, "text": "Runs large."}))
        .send()
        .await
        .expect("Failed to reply");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = anon
        .get(format!("{base_url}/api/conversations"))
        .query(&[("external_id", external_id.as_str())])
        .header(API_SECRET_HEADER, external_api_secret())
        .send()
        .await
        .expect("Failed to fetch conversations");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse response");
    let threads = body.as_array().expect("expected an array");
    assert_eq!(threads.len(), 1);
    let thread = threads.first().expect("one thread");
    assert_eq!(
        thread.get("text").and_then(Value::as_str),
        Some("What about sizing?")
    );
    assert_eq!(
        thread
            .get("messages")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(1)
    );
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_conversations_parameter_required() {
    let anon = client();
    let base_url = base_url();

    let resp = anon
        .get(format!("{base_url}/api/conversations"))
        .header(API_SECRET_HEADER, external_api_secret())
        .send()
        .await
        .expect("Failed to fetch conversations");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = anon
        .get(format!("{base_url}/api/conversations"))
        .query(&[("external_id", unique("missing-buyer").as_str())])
        .header(API_SECRET_HEADER, external_api_secret())
        .send()
        .await
        .expect("Failed to fetch conversations");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_shop_users_aggregation() {
    let owner_client = client();
    let pool = db_pool().await;
    let base_url = base_url();

    register_owner(&owner_client, &pool).await;
    let product_id = create_product(&owner_client, &unique("product")).await;

    let external_id = unique("buyer");
    let question_id = ingest_question(&external_id, product_id, "Color options?").await;

    // No messages yet, so the buyer does not appear.
    let resp = owner_client
        .get(format!("{base_url}/api/shop_users"))
        .send()
        .await
        .expect("Failed to fetch shop users");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    let before = body.as_array().expect("expected an array").len();
    assert_eq!(before, 0);

    // Two messages bracket the conversation window.
    for text in ["We have three.", "Blue ships tomorrow."] {
        let resp = owner_client
            .post(format!("{base_url}/api/messages"))
            .json(&json!({"question": question_id, "text": text}))
            .send()
            .await
            .expect("Failed to reply");
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = owner_client
        .get(format!("{base_url}/api/shop_users"))
        .send()
        .await
        .expect("Failed to fetch shop users");
    let body: Value = resp.json().await.expect("Failed to parse response");
    let summaries = body.as_array().expect("expected an array");
    assert_eq!(summaries.len(), 1);

    let summary = summaries.first().expect("one summary");
    assert_eq!(
        summary.get("external_id").and_then(Value::as_str),
        Some(external_id.as_str())
    );
    let first = summary
        .get("first_message_at")
        .and_then(Value::as_str)
        .expect("first_message_at missing");
    let last = summary
        .get("last_message_at")
        .and_then(Value::as_str)
        .expect("last_message_at missing");
    assert!(first <= last);
}
