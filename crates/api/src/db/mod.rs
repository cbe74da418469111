//! Database operations for the Sellerdesk `PostgreSQL` schema.
//!
//! ## Tables
//!
//! - `users` - Owner, manager, and external buyer accounts
//! - `stores` - One store per owner, the tenancy root
//! - `invite_tokens` - Single-use manager invite tokens
//! - `integration_tokens` - Encrypted marketplace API secrets
//! - `products` - Store product listings
//! - `questions` / `question_messages` / `question_answers` - Buyer conversations
//! - `session` - tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p sellerdesk-cli -- migrate
//! ```
//!
//! Queries use the sqlx runtime API (no offline query cache to maintain);
//! row structs derive `FromRow` and convert into domain types with
//! `TryFrom`, surfacing bad rows as [`RepositoryError::DataCorruption`].

pub mod integration_tokens;
pub mod invites;
pub mod products;
pub mod questions;
pub mod stores;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use integration_tokens::IntegrationTokenRepository;
pub use invites::InviteRepository;
pub use products::{ProductDraft, ProductRepository};
pub use questions::{ConversationRow, QuestionRepository};
pub use stores::StoreRepository;
pub use users::{NewManager, NewOwner, UserRepository};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map a unique-constraint violation onto [`RepositoryError::Conflict`]
/// with a caller-supplied message; everything else stays a database error.
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(err)
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
