//! Product repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use sellerdesk_core::{Marketplace, ProductId, StoreId, UserId};

use super::RepositoryError;
use crate::models::Product;

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    store_id: i32,
    title: String,
    description: String,
    specifications: serde_json::Value,
    marketplaces: Vec<Marketplace>,
    created_by: Option<i32>,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            store_id: StoreId::new(row.store_id),
            title: row.title,
            description: row.description,
            specifications: row.specifications,
            marketplaces: row.marketplaces,
            created_by: row.created_by.map(UserId::new),
            created_at: row.created_at,
        }
    }
}

/// Listing payload for a product, minus ownership columns.
#[derive(Debug, Clone, Copy)]
pub struct ProductDraft<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub specifications: &'a serde_json::Value,
    pub marketplaces: &'a [Marketplace],
}

const PRODUCT_COLUMNS: &str =
    "id, store_id, title, description, specifications, marketplaces, created_by, created_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store_id: StoreId) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE store_id = $1
            ORDER BY id
            "
        ))
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a product scoped to a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        store_id: StoreId,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE id = $1 AND store_id = $2
            "
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get a product regardless of store.
    ///
    /// Used by external question ingestion, where the product itself
    /// determines which store the question lands in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_unscoped(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE id = $1
            "
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a product in a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        store_id: StoreId,
        draft: ProductDraft<'_>,
        created_by: Option<UserId>,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            INSERT INTO products (store_id, title, description,
                                  specifications, marketplaces, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(store_id)
        .bind(draft.title)
        .bind(draft.description)
        .bind(draft.specifications)
        .bind(draft.marketplaces)
        .bind(created_by)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Overwrite a product's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist
    /// in the store, or `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        store_id: StoreId,
        id: ProductId,
        draft: ProductDraft<'_>,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            UPDATE products
            SET title = $3, description = $4, specifications = $5, marketplaces = $6
            WHERE id = $1 AND store_id = $2
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(store_id)
        .bind(draft.title)
        .bind(draft.description)
        .bind(draft.specifications)
        .bind(draft.marketplaces)
        .fetch_optional(self.pool)
        .await?;

        row.map_or(Err(RepositoryError::NotFound), |r| Ok(r.into()))
    }

    /// Delete a product scoped to a store.
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, store_id: StoreId, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM products
            WHERE id = $1 AND store_id = $2
            ",
        )
        .bind(id)
        .bind(store_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
