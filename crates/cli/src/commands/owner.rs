//! Owner account bootstrap commands.
//!
//! # Usage
//!
//! ```bash
//! # Create an owner account together with its store
//! sellerdesk owner create -u alice -s "Alice's Store" -e alice@example.com
//! ```
//!
//! # Environment Variables
//!
//! - `SELLERDESK_DATABASE_URL` - `PostgreSQL` connection string
//! - `DATABASE_URL` - fallback connection string

use secrecy::SecretString;
use sellerdesk_api::db::{self, NewOwner, RepositoryError, UserRepository};
use sellerdesk_api::services::auth;
use sellerdesk_core::{Email, EmailError};
use thiserror::Error;

/// Errors that can occur while bootstrapping an owner account.
#[derive(Debug, Error)]
pub enum OwnerError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Invalid email address.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Username, telegram ID, or store code already taken.
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing failed.
    #[error("Password hashing failed")]
    PasswordHash,
}

/// Create a new owner account together with its store.
///
/// The account gets a generated password, printed exactly once. There is
/// no recovery path for it besides creating a new owner.
///
/// # Arguments
///
/// * `username` - Owner's login name
/// * `store_name` - Display name of the store to create
/// * `email` - Optional email address
/// * `phone` - Optional contact phone
/// * `telegram_id` - Optional Telegram account ID
///
/// # Returns
///
/// The ID of the created owner.
pub async fn create(
    username: &str,
    store_name: &str,
    email: Option<&str>,
    phone: Option<&str>,
    telegram_id: Option<i64>,
) -> Result<i32, OwnerError> {
    dotenvy::dotenv().ok();

    let email = email.map(Email::parse).transpose()?;

    let database_url = std::env::var("SELLERDESK_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| OwnerError::MissingEnvVar("SELLERDESK_DATABASE_URL"))?;
    let database_url = SecretString::from(database_url);

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Creating owner: {} (store: {})", username, store_name);

    let password = auth::generate_password();
    let password_hash = auth::hash_password(&password).map_err(|_| OwnerError::PasswordHash)?;

    let repo = UserRepository::new(&pool);
    let (user, store) = repo
        .create_owner_with_store(
            NewOwner {
                username,
                email: email.as_ref(),
                password_hash: &password_hash,
                contact_phone: phone,
                telegram_id,
            },
            store_name,
            None,
        )
        .await?;

    tracing::info!(
        "Owner created successfully! ID: {}, Store ID: {}",
        user.id,
        store.id
    );

    // The password goes to stdout rather than the log stream so it never
    // lands in log aggregation.
    #[allow(clippy::print_stdout)]
    {
        println!("Owner account created:");
        println!("  Username: {}", user.username);
        println!("  Store:    {} (code {})", store.name, store.code);
        println!("  Password: {password}");
        println!();
        println!("Store this password now. It is not shown again.");
    }

    Ok(user.id.as_i32())
}
