//! User repository for database operations.
//!
//! Covers every account shape the platform knows: owners created at
//! registration together with their store, managers hired through invite
//! consumption, and external marketplace buyers materialized during
//! question ingestion.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use sellerdesk_core::{Email, Role, StoreId, UserId};

use super::stores::StoreRow;
use super::{RepositoryError, conflict_on_unique};
use crate::models::{Store, User};

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct UserRow {
    id: i32,
    username: String,
    email: Option<String>,
    role: Role,
    external_id: Option<String>,
    telegram_id: Option<i64>,
    contact_phone: Option<String>,
    store_id: Option<i32>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = row
            .email
            .map(|raw| {
                Email::from_str(&raw).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
                })
            })
            .transpose()?;

        Ok(Self {
            id: UserId::new(row.id),
            username: row.username,
            email,
            role: row.role,
            external_id: row.external_id,
            telegram_id: row.telegram_id,
            contact_phone: row.contact_phone,
            store_id: row.store_id.map(StoreId::new),
            created_at: row.created_at,
        })
    }
}

/// Row type for credential lookups during login.
#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    id: i32,
    username: String,
    email: Option<String>,
    role: Role,
    external_id: Option<String>,
    telegram_id: Option<i64>,
    contact_phone: Option<String>,
    store_id: Option<i32>,
    created_at: DateTime<Utc>,
    password_hash: String,
}

impl TryFrom<CredentialRow> for (User, String) {
    type Error = RepositoryError;

    fn try_from(row: CredentialRow) -> Result<Self, Self::Error> {
        let user = User::try_from(UserRow {
            id: row.id,
            username: row.username,
            email: row.email,
            role: row.role,
            external_id: row.external_id,
            telegram_id: row.telegram_id,
            contact_phone: row.contact_phone,
            store_id: row.store_id,
            created_at: row.created_at,
        })?;

        Ok((user, row.password_hash))
    }
}

const USER_COLUMNS: &str =
    "id, username, email, role, external_id, telegram_id, contact_phone, store_id, created_at";

/// Fields for an owner account created at registration.
#[derive(Debug, Clone, Copy)]
pub struct NewOwner<'a> {
    pub username: &'a str,
    pub email: Option<&'a Email>,
    pub password_hash: &'a str,
    pub contact_phone: Option<&'a str>,
    pub telegram_id: Option<i64>,
}

/// Fields for a manager account created by a store owner.
#[derive(Debug, Clone, Copy)]
pub struct NewManager<'a> {
    pub username: &'a str,
    pub email: Option<&'a Email>,
    pub password_hash: &'a str,
    pub contact_phone: Option<&'a str>,
    pub telegram_id: Option<i64>,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1
            "
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user together with their password hash for login.
    ///
    /// Accounts without a password (external marketplace buyers) are
    /// not returned, so they can never authenticate interactively.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_with_credentials(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialRow>(&format!(
            r"
            SELECT {USER_COLUMNS}, password_hash
            FROM users
            WHERE username = $1 AND password_hash IS NOT NULL
            "
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create an owner account and its store in one transaction.
    ///
    /// The store code defaults to a fresh UUID when the caller does not
    /// supply one. Either both rows exist afterwards or neither does.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username, telegram ID,
    /// or store code is already taken, or `RepositoryError::Database` on
    /// other failures.
    pub async fn create_owner_with_store(
        &self,
        new_owner: NewOwner<'_>,
        store_name: &str,
        store_code: Option<String>,
    ) -> Result<(User, Store), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let user_row = sqlx::query_as::<_, UserRow>(&format!(
            r"
            INSERT INTO users (username, email, password_hash, role,
                               contact_phone, telegram_id)
            VALUES ($1, $2, $3, 'owner', $4, $5)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(new_owner.username)
        .bind(new_owner.email.map(Email::as_str))
        .bind(new_owner.password_hash)
        .bind(new_owner.contact_phone)
        .bind(new_owner.telegram_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "Username or telegram ID is already taken"))?;

        let code = store_code.unwrap_or_else(|| Uuid::new_v4().to_string());

        let store_row = sqlx::query_as::<_, StoreRow>(
            r"
            INSERT INTO stores (name, code, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, code, owner_id, created_at
            ",
        )
        .bind(store_name)
        .bind(&code)
        .bind(user_row.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "Store code is already taken"))?;

        tx.commit().await?;

        Ok((user_row.try_into()?, store_row.into()))
    }

    /// Create a manager account attached to a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username or telegram ID
    /// is already taken, or `RepositoryError::Database` on other failures.
    pub async fn create_manager(
        &self,
        store_id: StoreId,
        new_manager: NewManager<'_>,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r"
            INSERT INTO users (username, email, password_hash, role,
                               contact_phone, telegram_id, store_id)
            VALUES ($1, $2, $3, 'manager', $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(new_manager.username)
        .bind(new_manager.email.map(Email::as_str))
        .bind(new_manager.password_hash)
        .bind(new_manager.contact_phone)
        .bind(new_manager.telegram_id)
        .bind(store_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Username or telegram ID is already taken"))?;

        row.try_into()
    }

    /// List the managers employed by a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list_managers(&self, store_id: StoreId) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE store_id = $1 AND role = 'manager'
            ORDER BY username
            "
        ))
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    /// Get a manager scoped to a store.
    ///
    /// Returns `None` for users outside the store or with another role,
    /// so handlers cannot accidentally reach across store boundaries.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_manager(
        &self,
        store_id: StoreId,
        id: UserId,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1 AND store_id = $2 AND role = 'manager'
            "
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Overwrite a manager's profile fields.
    ///
    /// Callers merge partial updates against the current row before
    /// calling; the statement itself writes every profile column.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such manager exists in
    /// the store, `RepositoryError::Conflict` if the telegram ID is
    /// already linked, or `RepositoryError::Database` on other failures.
    pub async fn update_manager_profile(
        &self,
        store_id: StoreId,
        id: UserId,
        email: Option<&Email>,
        contact_phone: Option<&str>,
        telegram_id: Option<i64>,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r"
            UPDATE users
            SET email = $3, contact_phone = $4, telegram_id = $5
            WHERE id = $1 AND store_id = $2 AND role = 'manager'
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(store_id)
        .bind(email.map(Email::as_str))
        .bind(contact_phone)
        .bind(telegram_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Telegram ID is already linked to another account"))?;

        row.map_or(Err(RepositoryError::NotFound), |r| r.try_into())
    }

    /// Replace a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist,
    /// or `RepositoryError::Database` if the query fails.
    pub async fn set_password_hash(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET password_hash = $2
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(password_hash)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a manager scoped to a store.
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_manager(
        &self,
        store_id: StoreId,
        id: UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM users
            WHERE id = $1 AND store_id = $2 AND role = 'manager'
            ",
        )
        .bind(id)
        .bind(store_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get a user by their marketplace identity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn get_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE external_id = $1
            "
        ))
        .bind(external_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Get or create the buyer account behind a marketplace identity.
    ///
    /// Ingestion calls this for every incoming question, so the upsert
    /// resolves in a single round trip whether the row exists or not.
    /// The username is derived from the first characters of the external
    /// identity and is never used for interactive login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the derived username
    /// collides with an existing account, or `RepositoryError::Database`
    /// on other failures.
    pub async fn ensure_external(&self, external_id: &str) -> Result<User, RepositoryError> {
        let prefix: String = external_id.chars().take(12).collect();
        let username = format!("user_{prefix}");

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r"
            INSERT INTO users (username, external_id, role)
            VALUES ($1, $2, 'user')
            ON CONFLICT (external_id)
            DO UPDATE SET external_id = EXCLUDED.external_id
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(&username)
        .bind(external_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Username is already taken"))?;

        row.try_into()
    }
}
