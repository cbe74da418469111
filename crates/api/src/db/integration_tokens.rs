//! Integration token repository for database operations.
//!
//! Rows hold marketplace API secrets as AES-GCM ciphertext only. The
//! `(store_id, marketplace)` pair is unique, so a store carries at most
//! one credential per marketplace and duplicates surface as conflicts
//! instead of silent overwrites.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use sellerdesk_core::{IntegrationTokenId, Marketplace, StoreId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::IntegrationToken;

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct IntegrationTokenRow {
    id: i32,
    store_id: i32,
    marketplace: Marketplace,
    secret_ciphertext: String,
    created_at: DateTime<Utc>,
}

impl From<IntegrationTokenRow> for IntegrationToken {
    fn from(row: IntegrationTokenRow) -> Self {
        Self {
            id: IntegrationTokenId::new(row.id),
            store_id: StoreId::new(row.store_id),
            marketplace: row.marketplace,
            secret_ciphertext: row.secret_ciphertext,
            created_at: row.created_at,
        }
    }
}

/// Repository for integration token database operations.
pub struct IntegrationTokenRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> IntegrationTokenRepository<'a> {
    /// Create a new integration token repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's integration tokens.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store_id: StoreId) -> Result<Vec<IntegrationToken>, RepositoryError> {
        let rows = sqlx::query_as::<_, IntegrationTokenRow>(
            r"
            SELECT id, store_id, marketplace, secret_ciphertext, created_at
            FROM integration_tokens
            WHERE store_id = $1
            ORDER BY marketplace
            ",
        )
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get the token a store holds for one marketplace.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        store_id: StoreId,
        marketplace: Marketplace,
    ) -> Result<Option<IntegrationToken>, RepositoryError> {
        let row = sqlx::query_as::<_, IntegrationTokenRow>(
            r"
            SELECT id, store_id, marketplace, secret_ciphertext, created_at
            FROM integration_tokens
            WHERE store_id = $1 AND marketplace = $2
            ",
        )
        .bind(store_id)
        .bind(marketplace)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Store a new token for a (store, marketplace) pair.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the pair already holds a
    /// token, or `RepositoryError::Database` on other failures.
    pub async fn create(
        &self,
        store_id: StoreId,
        marketplace: Marketplace,
        secret_ciphertext: &str,
    ) -> Result<IntegrationToken, RepositoryError> {
        let row = sqlx::query_as::<_, IntegrationTokenRow>(
            r"
            INSERT INTO integration_tokens (store_id, marketplace, secret_ciphertext)
            VALUES ($1, $2, $3)
            RETURNING id, store_id, marketplace, secret_ciphertext, created_at
            ",
        )
        .bind(store_id)
        .bind(marketplace)
        .bind(secret_ciphertext)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "A token for this marketplace already exists"))?;

        Ok(row.into())
    }

    /// Replace the secret held for a (store, marketplace) pair.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the pair holds no token,
    /// or `RepositoryError::Database` if the query fails.
    pub async fn update_secret(
        &self,
        store_id: StoreId,
        marketplace: Marketplace,
        secret_ciphertext: &str,
    ) -> Result<IntegrationToken, RepositoryError> {
        let row = sqlx::query_as::<_, IntegrationTokenRow>(
            r"
            UPDATE integration_tokens
            SET secret_ciphertext = $3
            WHERE store_id = $1 AND marketplace = $2
            RETURNING id, store_id, marketplace, secret_ciphertext, created_at
            ",
        )
        .bind(store_id)
        .bind(marketplace)
        .bind(secret_ciphertext)
        .fetch_optional(self.pool)
        .await?;

        row.map_or(Err(RepositoryError::NotFound), |r| Ok(r.into()))
    }

    /// Delete the token a store holds for one marketplace.
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        store_id: StoreId,
        marketplace: Marketplace,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM integration_tokens
            WHERE store_id = $1 AND marketplace = $2
            ",
        )
        .bind(store_id)
        .bind(marketplace)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
