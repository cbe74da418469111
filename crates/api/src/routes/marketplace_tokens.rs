//! Marketplace API token routes, owner-only.
//!
//! Secrets are sealed before they reach storage and never sealed back
//! out: every response carries a masked `token_preview` instead. A row
//! whose ciphertext no longer decrypts renders the fixed placeholder
//! rather than an error.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sellerdesk_core::{
    DECODE_FAILURE_PREVIEW, IntegrationTokenId, Marketplace, StoreId, mask_secret,
};

use crate::crypto::TokenCipher;
use crate::db::{IntegrationTokenRepository, StoreRepository};
use crate::error::ApiError;
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, IntegrationToken, Store};
use crate::state::AppState;

/// Response body for a stored token. The secret itself never appears.
#[derive(Debug, Serialize)]
pub struct MarketplaceTokenResponse {
    pub id: IntegrationTokenId,
    pub store_id: StoreId,
    pub marketplace: Marketplace,
    pub token_preview: String,
    pub created_at: DateTime<Utc>,
}

impl MarketplaceTokenResponse {
    /// Render a stored token with its masked preview.
    fn render(cipher: &TokenCipher, token: IntegrationToken) -> Self {
        let token_preview = match cipher.decrypt(&token.secret_ciphertext) {
            Ok(plain) => mask_secret(&plain),
            Err(_) => {
                tracing::warn!(
                    store_id = token.store_id.as_i32(),
                    marketplace = %token.marketplace,
                    "Stored marketplace secret failed to decrypt"
                );
                DECODE_FAILURE_PREVIEW.to_string()
            }
        };

        Self {
            id: token.id,
            store_id: token.store_id,
            marketplace: token.marketplace,
            token_preview,
            created_at: token.created_at,
        }
    }
}

/// Load a store by ID, requiring the caller to own it.
async fn owned_store(
    state: &AppState,
    current: &CurrentUser,
    store_id: StoreId,
) -> Result<Store, ApiError> {
    let store = StoreRepository::new(state.pool())
        .get(store_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Store not found".to_string()))?;
    if !store.is_owned_by(current.id) {
        return Err(ApiError::PermissionDenied(
            "You do not own this store".to_string(),
        ));
    }
    Ok(store)
}

/// List a store's marketplace tokens with masked previews.
///
/// `GET /api/stores/{store_id}/marketplace-tokens`
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(store_id): Path<StoreId>,
) -> Result<Json<Vec<MarketplaceTokenResponse>>, ApiError> {
    let store = owned_store(&state, &current, store_id).await?;
    let tokens = IntegrationTokenRepository::new(state.pool())
        .list(store.id)
        .await?;

    let rendered = tokens
        .into_iter()
        .map(|t| MarketplaceTokenResponse::render(state.cipher(), t))
        .collect();
    Ok(Json(rendered))
}

/// Request body for storing a marketplace secret.
///
/// The marketplace arrives as a string and is parsed strictly, so an
/// unknown name is a 400 with the offending value named.
#[derive(Debug, Deserialize)]
pub struct CreateMarketplaceTokenRequest {
    pub marketplace: String,
    pub token: String,
}

/// Store a new marketplace secret for a store.
///
/// `POST /api/stores/{store_id}/marketplace-tokens`
///
/// One token per (store, marketplace) pair; a second submission for the
/// same marketplace is a 409, not an overwrite.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(store_id): Path<StoreId>,
    Json(req): Json<CreateMarketplaceTokenRequest>,
) -> Result<(StatusCode, Json<MarketplaceTokenResponse>), ApiError> {
    let store = owned_store(&state, &current, store_id).await?;

    let marketplace = req
        .marketplace
        .parse::<Marketplace>()
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    if req.token.is_empty() {
        return Err(ApiError::Validation("Token must not be empty".to_string()));
    }

    let sealed = state
        .cipher()
        .encrypt(&req.token)
        .map_err(|e| ApiError::Internal(format!("Failed to encrypt token: {e}")))?;
    let token = IntegrationTokenRepository::new(state.pool())
        .create(store.id, marketplace, &sealed)
        .await?;

    tracing::info!(
        store_id = store.id.as_i32(),
        marketplace = %token.marketplace,
        "Marketplace token stored"
    );

    Ok((
        StatusCode::CREATED,
        Json(MarketplaceTokenResponse::render(state.cipher(), token)),
    ))
}

/// Get one marketplace token by marketplace name, masked.
///
/// `GET /api/stores/{store_id}/marketplace-tokens/{marketplace}`
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path((store_id, marketplace)): Path<(StoreId, Marketplace)>,
) -> Result<Json<MarketplaceTokenResponse>, ApiError> {
    let store = owned_store(&state, &current, store_id).await?;
    let token = IntegrationTokenRepository::new(state.pool())
        .get(store.id, marketplace)
        .await?
        .ok_or_else(|| ApiError::NotFound("Marketplace token not found".to_string()))?;
    Ok(Json(MarketplaceTokenResponse::render(state.cipher(), token)))
}

/// Request body for replacing a stored secret.
#[derive(Debug, Deserialize)]
pub struct UpdateMarketplaceTokenRequest {
    pub token: String,
}

/// Replace the secret for a (store, marketplace) pair.
///
/// `PUT /api/stores/{store_id}/marketplace-tokens/{marketplace}`
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path((store_id, marketplace)): Path<(StoreId, Marketplace)>,
    Json(req): Json<UpdateMarketplaceTokenRequest>,
) -> Result<Json<MarketplaceTokenResponse>, ApiError> {
    let store = owned_store(&state, &current, store_id).await?;

    if req.token.is_empty() {
        return Err(ApiError::Validation("Token must not be empty".to_string()));
    }

    let sealed = state
        .cipher()
        .encrypt(&req.token)
        .map_err(|e| ApiError::Internal(format!("Failed to encrypt token: {e}")))?;
    let token = IntegrationTokenRepository::new(state.pool())
        .update_secret(store.id, marketplace, &sealed)
        .await?;

    tracing::info!(
        store_id = store.id.as_i32(),
        marketplace = %token.marketplace,
        "Marketplace token replaced"
    );

    Ok(Json(MarketplaceTokenResponse::render(state.cipher(), token)))
}

/// Delete a stored marketplace token.
///
/// `DELETE /api/stores/{store_id}/marketplace-tokens/{marketplace}`
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path((store_id, marketplace)): Path<(StoreId, Marketplace)>,
) -> Result<StatusCode, ApiError> {
    let store = owned_store(&state, &current, store_id).await?;
    let deleted = IntegrationTokenRepository::new(state.pool())
        .delete(store.id, marketplace)
        .await?;
    if !deleted {
        return Err(ApiError::NotFound(
            "Marketplace token not found".to_string(),
        ));
    }

    tracing::info!(
        store_id = store.id.as_i32(),
        marketplace = %marketplace,
        "Marketplace token deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
