//! Product domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use sellerdesk_core::{Marketplace, ProductId, StoreId, UserId};

/// A product listing scoped to one store.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Owning store.
    pub store_id: StoreId,
    /// Listing title.
    pub title: String,
    /// Listing description, possibly empty.
    pub description: String,
    /// Free-form attribute map (size, color, material, ...).
    pub specifications: serde_json::Value,
    /// Marketplaces the product is listed on.
    pub marketplaces: Vec<Marketplace>,
    /// Staff account that created the listing.
    pub created_by: Option<UserId>,
    /// When the listing was created.
    pub created_at: DateTime<Utc>,
}
