//! Integration tests for Sellerdesk.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! cargo run -p sellerdesk-cli -- migrate
//!
//! # Start the API server
//! cargo run -p sellerdesk-api
//!
//! # Run integration tests (ignored by default)
//! cargo test -p sellerdesk-integration-tests -- --ignored
//! ```
//!
//! Tests talk to a live server over HTTP and to the same database the
//! server uses, so they are `#[ignore]`d in a plain `cargo test` run.
//! Every test registers its own owner and store with random names, which
//! keeps repeated runs against the same database from colliding.
//!
//! # Environment Variables
//!
//! - `SELLERDESK_BASE_URL` - API base URL (default: `http://localhost:8000`)
//! - `SELLERDESK_DATABASE_URL` - `PostgreSQL` connection string
//! - `SELLERDESK_EXTERNAL_API_SECRET` - must match the server's value

use reqwest::Client;
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

/// Header carrying the shared ingestion secret.
pub const API_SECRET_HEADER: &str = "X-API-SECRET";

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("SELLERDESK_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

/// Shared secret for ingestion endpoints.
///
/// # Panics
///
/// Panics when `SELLERDESK_EXTERNAL_API_SECRET` is unset; ingestion tests
/// cannot run without it.
#[must_use]
pub fn external_api_secret() -> String {
    std::env::var("SELLERDESK_EXTERNAL_API_SECRET")
        .expect("SELLERDESK_EXTERNAL_API_SECRET must match the running server")
}

/// Create an HTTP client with a cookie store, so one login carries
/// across the following requests.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Connect to the database the server under test is using.
///
/// # Panics
///
/// Panics when no database URL is configured or the connection fails.
pub async fn db_pool() -> PgPool {
    let url = std::env::var("SELLERDESK_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("SELLERDESK_DATABASE_URL must be set");
    PgPool::connect(&url)
        .await
        .expect("Failed to connect to database")
}

/// Random suffix so repeated runs never collide on unique columns.
#[must_use]
pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// An owner registered by a test, with its generated store.
pub struct TestOwner {
    pub username: String,
    pub password: String,
    pub user_id: i32,
    pub store_id: i32,
}

/// Register a fresh owner and log the client in as them.
///
/// The store ID comes from the database; the registration endpoint
/// deliberately returns only the user ID.
///
/// # Panics
///
/// Panics when registration or login does not succeed, since nothing
/// downstream is meaningful without them.
pub async fn register_owner(client: &Client, pool: &PgPool) -> TestOwner {
    let base_url = base_url();
    let username = unique("owner");
    let password = Uuid::new_v4().to_string();

    let resp = client
        .post(format!("{base_url}/api/register"))
        .json(&json!({
            "username": username,
            "role": "owner",
            "password": password,
            "password_confirm": password,
            "store_name": unique("store"),
        }))
        .send()
        .await
        .expect("Failed to register owner");
    assert_eq!(resp.status(), 201, "owner registration should succeed");

    let body: Value = resp.json().await.expect("Failed to parse response");
    let user_id = body
        .get("user_id")
        .and_then(Value::as_i64)
        .expect("user_id missing");
    let user_id = i32::try_from(user_id).expect("user_id out of range");

    let resp = client
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({"username": username, "password": password}))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), 200, "owner login should succeed");

    let store_id: i32 = sqlx::query_scalar("SELECT id FROM stores WHERE owner_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("Registered owner should have a store");

    TestOwner {
        username,
        password,
        user_id,
        store_id,
    }
}

/// Create a product in the owner's store and return its ID.
///
/// # Panics
///
/// Panics when the API rejects the creation.
pub async fn create_product(client: &Client, title: &str) -> i32 {
    let base_url = base_url();
    let resp = client
        .post(format!("{base_url}/api/products"))
        .json(&json!({"title": title, "description": "integration test product"}))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), 201, "product creation should succeed");

    let body: Value = resp.json().await.expect("Failed to parse response");
    let id = body
        .get("id")
        .and_then(Value::as_i64)
        .expect("product id missing");
    i32::try_from(id).expect("product id out of range")
}
