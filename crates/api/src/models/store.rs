//! Store domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use sellerdesk_core::{StoreId, UserId};

/// A seller's store, the tenancy root every scoped resource hangs off.
///
/// At most one store per owner, enforced by a unique constraint on the
/// owner column.
#[derive(Debug, Clone, Serialize)]
pub struct Store {
    /// Unique store ID.
    pub id: StoreId,
    /// Display name.
    pub name: String,
    /// External store code. Generated as a UUID when not supplied at
    /// creation; immutable afterwards.
    pub code: String,
    /// The owning account. `None` only for stores orphaned by owner
    /// deletion mid-flight; scoped lookups treat those as unreachable.
    pub owner_id: Option<UserId>,
    /// When the store was created.
    pub created_at: DateTime<Utc>,
}

impl Store {
    /// Whether the given user is this store's owner.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == Some(user_id)
    }
}
