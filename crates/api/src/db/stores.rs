//! Store repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use sellerdesk_core::{Role, StoreId, UserId};

use super::RepositoryError;
use crate::models::Store;

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct StoreRow {
    id: i32,
    name: String,
    code: String,
    owner_id: Option<i32>,
    created_at: DateTime<Utc>,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Self {
            id: StoreId::new(row.id),
            name: row.name,
            code: row.code,
            owner_id: row.owner_id.map(UserId::new),
            created_at: row.created_at,
        }
    }
}

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a store by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            SELECT id, name, code, owner_id, created_at
            FROM stores
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get the store owned by a user, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_owner(&self, owner_id: UserId) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            SELECT id, name, code, owner_id, created_at
            FROM stores
            WHERE owner_id = $1
            ",
        )
        .bind(owner_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Resolve the store an identity acts for.
    ///
    /// This is the single place the role-dependent store association
    /// lives: owners are looked up through the store's owner column,
    /// managers through their employment column, and plain users have no
    /// store at all. Every store-scoped handler goes through here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn resolve_for_identity(
        &self,
        user_id: UserId,
        role: Role,
    ) -> Result<Option<Store>, RepositoryError> {
        match role {
            Role::Owner => self.get_by_owner(user_id).await,
            Role::Manager => {
                let row = sqlx::query_as::<_, StoreRow>(
                    r"
                    SELECT s.id, s.name, s.code, s.owner_id, s.created_at
                    FROM stores s
                    JOIN users u ON u.store_id = s.id
                    WHERE u.id = $1
                    ",
                )
                .bind(user_id)
                .fetch_optional(self.pool)
                .await?;

                Ok(row.map(Into::into))
            }
            Role::User => Ok(None),
        }
    }
}
