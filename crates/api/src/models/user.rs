//! User domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use sellerdesk_core::{Email, Role, StoreId, UserId};

/// An account: owner, manager, or external buyer.
///
/// The password hash never leaves the repository layer, so this type can
/// be serialized into API responses directly.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name, unique across all accounts.
    pub username: String,
    /// Contact email, if provided.
    pub email: Option<Email>,
    /// Account role.
    pub role: Role,
    /// Marketplace-side identifier for externally materialized buyers.
    pub external_id: Option<String>,
    /// Telegram chat ID for notification bots.
    pub telegram_id: Option<i64>,
    /// Contact phone, free-form.
    pub contact_phone: Option<String>,
    /// Employing store, set for managers only. Owners reach their store
    /// through the store's owner column instead.
    pub store_id: Option<StoreId>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Display label for conversation grouping: the marketplace identity
    /// when known, otherwise a synthetic `user_{id}` tag.
    #[must_use]
    pub fn external_label(&self) -> String {
        self.external_id
            .clone()
            .unwrap_or_else(|| format!("user_{}", self.id))
    }
}
