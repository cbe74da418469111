//! Integration tests for products, questions, messages, and answers.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p sellerdesk-api)
//!
//! Run with: cargo test -p sellerdesk-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use sellerdesk_integration_tests::{
    base_url, client, create_product, db_pool, register_owner, unique,
};

// ============================================================================
// Product Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_product_crud() {
    let owner_client = client();
    let pool = db_pool().await;
    let base_url = base_url();

    register_owner(&owner_client, &pool).await;

    let title = unique("product");
    let resp = owner_client
        .post(format!("{base_url}/api/products"))
        .json(&json!({
            "title": title,
            "description": "A winter jacket",
            "specifications": {"size": "L", "color": "black"},
            "marketplaces": ["ozon", "wildberries"],
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse response");
    let product_id = body
        .get("id")
        .and_then(Value::as_i64)
        .expect("product id missing");
    assert_eq!(
        body.get("marketplaces").and_then(Value::as_array).map(Vec::len),
        Some(2)
    );

    // The listing is scoped to the caller's store.
    let resp = owner_client
        .get(format!("{base_url}/api/products"))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    let listed = body.as_array().expect("expected an array");
    assert_eq!(listed.len(), 1);

    // Update the title.
    let resp = owner_client
        .put(format!("{base_url}/api/products/{product_id}"))
        .json(&json!({"title": "Renamed jacket", "description": "A winter jacket"}))
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(
        body.get("title").and_then(Value::as_str),
        Some("Renamed jacket")
    );

    // Delete and verify gone.
    let resp = owner_client
        .delete(format!("{base_url}/api/products/{product_id}"))
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = owner_client
        .get(format!("{base_url}/api/products/{product_id}"))
        .send()
        .await
        .expect("Failed to fetch deleted product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_product_validation() {
    let owner_client = client();
    let pool = db_pool().await;
    let base_url = base_url();

    register_owner(&owner_client, &pool).await;

    let resp = owner_client
        .post(format!("{base_url}/api/products"))
        .json(&json!({"title": "   "}))
        .send()
        .await
        .expect("Failed to send product");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = owner_client
        .post(format!("{base_url}/api/products"))
        .json(&json!({"title": "Jacket", "marketplaces": ["ebay"]}))
        .send()
        .await
        .expect("Failed to send product");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_products_isolated_between_stores() {
    let client_a = client();
    let client_b = client();
    let pool = db_pool().await;
    let base_url = base_url();

    register_owner(&client_a, &pool).await;
    register_owner(&client_b, &pool).await;

    let product_id = create_product(&client_a, &unique("product")).await;

    // Store B's listing does not contain store A's product, and fetching
    // it by ID comes back 404 rather than 403.
    let resp = client_b
        .get(format!("{base_url}/api/products"))
        .send()
        .await
        .expect("Failed to list products");
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body.as_array().map(Vec::len), Some(0));

    let resp = client_b
        .get(format!("{base_url}/api/products/{product_id}"))
        .send()
        .await
        .expect("Failed to fetch foreign product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Question & Message Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_question_thread_flow() {
    let owner_client = client();
    let pool = db_pool().await;
    let base_url = base_url();

    let owner = register_owner(&owner_client, &pool).await;
    let product_id = create_product(&owner_client, &unique("product")).await;

    // Ask a question as staff.
    let resp = owner_client
        .post(format!("{base_url}/api/questions"))
        .json(&json!({
            "product": product_id,
            "text": "Does it come in red?",
            "marketplace": "ozon",
        }))
        .send()
        .await
        .expect("Failed to create question");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse response");
    let question_id = body
        .get("id")
        .and_then(Value::as_i64)
        .expect("question id missing");
    assert_eq!(
        body.get("marketplace").and_then(Value::as_str),
        Some("ozon")
    );

    // Reply in the thread.
    let resp = owner_client
        .post(format!("{base_url}/api/messages"))
        .json(&json!({"question": question_id, "text": "Only black this season."}))
        .send()
        .await
        .expect("Failed to create message");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse response");
    let message_id = body
        .get("id")
        .and_then(Value::as_i64)
        .expect("message id missing");
    assert_eq!(body.get("role").and_then(Value::as_str), Some("owner"));
    // Provenance is copied from the question.
    assert_eq!(
        body.get("marketplace").and_then(Value::as_str),
        Some("ozon")
    );

    // Thread a reply under the first message.
    let resp = owner_client
        .post(format!("{base_url}/api/messages"))
        .json(&json!({
            "question": question_id,
            "text": "Red arrives next month.",
            "parent": message_id,
        }))
        .send()
        .await
        .expect("Failed to create threaded message");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Attach a formal answer.
    let resp = owner_client
        .post(format!("{base_url}/api/answers"))
        .json(&json!({"question": question_id, "text": "Black only."}))
        .send()
        .await
        .expect("Failed to create answer");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Staff listings include everything just written.
    let resp = owner_client
        .get(format!("{base_url}/api/questions/{question_id}"))
        .send()
        .await
        .expect("Failed to fetch question");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = owner_client
        .get(format!("{base_url}/api/messages"))
        .send()
        .await
        .expect("Failed to list messages");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert!(body.as_array().is_some_and(|a| a.len() >= 2));

    let resp = owner_client
        .get(format!("{base_url}/api/answers/by-user/{}", owner.user_id))
        .send()
        .await
        .expect("Failed to list answers by user");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_question_validation() {
    let owner_client = client();
    let pool = db_pool().await;
    let base_url = base_url();

    register_owner(&owner_client, &pool).await;
    let product_id = create_product(&owner_client, &unique("product")).await;

    // Empty text.
    let resp = owner_client
        .post(format!("{base_url}/api/questions"))
        .json(&json!({"product": product_id, "text": ""}))
        .send()
        .await
        .expect("Failed to send question");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Unknown product.
    let resp = owner_client
        .post(format!("{base_url}/api/questions"))
        .json(&json!({"product": 999_999_999, "text": "Hello?"}))
        .send()
        .await
        .expect("Failed to send question");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_message_parent_must_match_question() {
    let owner_client = client();
    let pool = db_pool().await;
    let base_url = base_url();

    register_owner(&owner_client, &pool).await;
    let product_id = create_product(&owner_client, &unique("product")).await;

    // Two separate questions.
    let mut question_ids = Vec::new();
    for text in ["First question?", "Second question?"] {
        let resp = owner_client
            .post(format!("{base_url}/api/questions"))
            .json(&json!({"product": product_id, "text": text}))
            .send()
            .await
            .expect("Failed to create question");
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = resp.json().await.expect("Failed to parse response");
        question_ids.push(
            body.get("id")
                .and_then(Value::as_i64)
                .expect("question id missing"),
        );
    }
    let first = *question_ids.first().expect("first question");
    let second = *question_ids.get(1).expect("second question");

    // A message on the first question.
    let resp = owner_client
        .post(format!("{base_url}/api/messages"))
        .json(&json!({"question": first, "text": "In thread one."}))
        .send()
        .await
        .expect("Failed to create message");
    let body: Value = resp.json().await.expect("Failed to parse response");
    let message_id = body
        .get("id")
        .and_then(Value::as_i64)
        .expect("message id missing");

    // Cannot be the parent of a message in the second question.
    let resp = owner_client
        .post(format!("{base_url}/api/messages"))
        .json(&json!({
            "question": second,
            "text": "Crossing threads.",
            "parent": message_id,
        }))
        .send()
        .await
        .expect("Failed to send cross-thread message");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // A parent that does not exist at all is also a 400.
    let resp = owner_client
        .post(format!("{base_url}/api/messages"))
        .json(&json!({
            "question": second,
            "text": "Replying to nothing.",
            "parent": 999_999_999,
        }))
        .send()
        .await
        .expect("Failed to send orphan reply");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_question_endpoints_require_auth() {
    let anon = client();
    let base_url = base_url();

    let resp = anon
        .get(format!("{base_url}/api/questions"))
        .send()
        .await
        .expect("Failed to list questions");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = anon
        .post(format!("{base_url}/api/answers"))
        .json(&json!({"question": 1, "text": "Anonymous answer."}))
        .send()
        .await
        .expect("Failed to send answer");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
