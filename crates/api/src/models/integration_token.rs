//! Marketplace integration token domain type.

use chrono::{DateTime, Utc};

use sellerdesk_core::{IntegrationTokenId, Marketplace, StoreId};

/// An encrypted marketplace API secret held for one (store, marketplace)
/// pair.
///
/// Deliberately not `Serialize`: the ciphertext must never leak into a
/// response body. Routes render a masked preview instead.
#[derive(Debug, Clone)]
pub struct IntegrationToken {
    /// Unique row ID.
    pub id: IntegrationTokenId,
    /// Owning store.
    pub store_id: StoreId,
    /// Which marketplace this secret authenticates against.
    pub marketplace: Marketplace,
    /// Sealed secret, `base64(nonce || ciphertext)`.
    pub secret_ciphertext: String,
    /// When the token was stored.
    pub created_at: DateTime<Utc>,
}
