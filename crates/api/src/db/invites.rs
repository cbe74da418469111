//! Invite token repository for database operations.
//!
//! Tokens move through exactly one transition, issued to consumed, and
//! the consume path claims the token and creates the manager account in
//! the same transaction. Expiry is derived from `created_at` at read
//! time rather than stored, so a token needs no background sweeper.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use sellerdesk_core::{Email, InviteId, InviteStatus, StoreId};

use super::users::{NewManager, UserRow};
use super::{RepositoryError, conflict_on_unique};
use crate::models::{InviteToken, User};

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct InviteRow {
    id: i32,
    token: Uuid,
    store_id: i32,
    created_at: DateTime<Utc>,
    status: InviteStatus,
}

impl From<InviteRow> for InviteToken {
    fn from(row: InviteRow) -> Self {
        Self {
            id: InviteId::new(row.id),
            token: row.token,
            store_id: StoreId::new(row.store_id),
            created_at: row.created_at,
            status: row.status,
        }
    }
}

/// Repository for invite token database operations.
pub struct InviteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InviteRepository<'a> {
    /// Create a new invite repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Issue a fresh invite token for a store.
    ///
    /// Every call mints a new token; outstanding tokens for the same
    /// store stay valid until consumed or expired.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn issue(&self, store_id: StoreId) -> Result<InviteToken, RepositoryError> {
        let row = sqlx::query_as::<_, InviteRow>(
            r"
            INSERT INTO invite_tokens (token, store_id)
            VALUES ($1, $2)
            RETURNING id, token, store_id, created_at, status
            ",
        )
        .bind(Uuid::new_v4())
        .bind(store_id)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Look up an invite by its token value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_token(&self, token: Uuid) -> Result<Option<InviteToken>, RepositoryError> {
        let row = sqlx::query_as::<_, InviteRow>(
            r"
            SELECT id, token, store_id, created_at, status
            FROM invite_tokens
            WHERE token = $1
            ",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Claim an invite and create the manager account it admits.
    ///
    /// The claim is a compare-and-set on the issued status, so two
    /// concurrent submissions of the same token cannot both succeed.
    /// If the account insert fails the claim rolls back and the token
    /// stays issued.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the token was already
    /// consumed or the username is taken, or `RepositoryError::Database`
    /// on other failures.
    pub async fn consume(
        &self,
        token: Uuid,
        new_manager: NewManager<'_>,
    ) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let claimed = sqlx::query_as::<_, InviteRow>(
            r"
            UPDATE invite_tokens
            SET status = 'consumed'
            WHERE token = $1 AND status = 'issued'
            RETURNING id, token, store_id, created_at, status
            ",
        )
        .bind(token)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(invite) = claimed else {
            return Err(RepositoryError::Conflict(
                "Invite token has already been used".to_owned(),
            ));
        };

        let user_row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (username, email, password_hash, role,
                               contact_phone, telegram_id, store_id)
            VALUES ($1, $2, $3, 'manager', $4, $5, $6)
            RETURNING id, username, email, role, external_id,
                      telegram_id, contact_phone, store_id, created_at
            ",
        )
        .bind(new_manager.username)
        .bind(new_manager.email.map(Email::as_str))
        .bind(new_manager.password_hash)
        .bind(new_manager.contact_phone)
        .bind(new_manager.telegram_id)
        .bind(invite.store_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "Username or telegram ID is already taken"))?;

        tx.commit().await?;

        user_row.try_into()
    }
}
