//! Invite lifecycle routes.
//!
//! An owner issues a link for their store, shares it out of band, then
//! drives registration through it. Inspection is unauthenticated so the
//! link can render a landing page; everything that mutates requires the
//! issuing owner's session.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sellerdesk_core::{StoreId, UserId};

use crate::error::ApiError;
use crate::middleware::RequireAuth;
use crate::models::Store;
use crate::services::{InviteInspection, InviteService, ManagerDetails};
use crate::state::AppState;

/// Response body for invite generation.
#[derive(Debug, Serialize)]
pub struct GenerateInviteResponse {
    pub invite_link: String,
}

/// Issue a fresh invite link for a store.
///
/// `POST /api/owners/{store_id}/generate-invite`
///
/// The link points at the public dashboard path `/invite/{token}/`,
/// built from the configured base URL. Each call issues a new token;
/// earlier ones stay live until consumed or expired.
pub async fn generate(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(store_id): Path<StoreId>,
) -> Result<Json<GenerateInviteResponse>, ApiError> {
    let service = InviteService::new(state.pool());
    let invite = service.issue(store_id, current.id).await?;

    let link = state
        .config()
        .base_url
        .join(&format!("invite/{}/", invite.token))
        .map_err(|e| ApiError::Internal(format!("Failed to build invite link: {e}")))?;

    tracing::info!(store_id = store_id.as_i32(), "Invite issued");

    Ok(Json(GenerateInviteResponse {
        invite_link: link.to_string(),
    }))
}

/// Inspect an invite token without authentication.
///
/// `GET /api/invite/{token}`
///
/// Live tokens return 200; expired ones return 400 but still carry the
/// payload so the landing page can explain itself. Unknown and consumed
/// tokens get a bare 400 error.
pub async fn inspect(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> Result<(StatusCode, Json<InviteInspection>), ApiError> {
    let service = InviteService::new(state.pool());
    let inspection = service.inspect(token).await?;

    let status = if inspection.is_expired {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };
    Ok((status, Json(inspection)))
}

/// Request body for invite consumption.
#[derive(Debug, Deserialize)]
pub struct ConsumeInviteRequest {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telegram_id: Option<i64>,
    #[serde(default)]
    pub contact_phone: Option<String>,
}

/// Response body for invite consumption.
#[derive(Debug, Serialize)]
pub struct ConsumeInviteResponse {
    pub message: String,
    pub user_id: UserId,
    pub username: String,
    pub generated_password: String,
}

/// Consume an invite, creating the manager account it admits.
///
/// `POST /api/invite/{token}`
///
/// Only the issuing store's owner may consume. The generated password
/// appears in this response and nowhere else.
pub async fn consume(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(token): Path<Uuid>,
    Json(req): Json<ConsumeInviteRequest>,
) -> Result<(StatusCode, Json<ConsumeInviteResponse>), ApiError> {
    let service = InviteService::new(state.pool());
    let (manager, generated_password) = service
        .consume(
            token,
            current.id,
            ManagerDetails {
                username: &req.username,
                email: req.email.as_deref(),
                contact_phone: req.contact_phone.as_deref(),
                telegram_id: req.telegram_id,
            },
        )
        .await?;

    tracing::info!(
        manager_id = manager.id.as_i32(),
        "Manager registered via invite"
    );

    Ok((
        StatusCode::CREATED,
        Json(ConsumeInviteResponse {
            message: "Manager registered".to_string(),
            user_id: manager.id,
            username: manager.username,
            generated_password,
        }),
    ))
}

/// Response body for the owner-side confirmation check.
#[derive(Debug, Serialize)]
pub struct ConfirmInviteResponse {
    pub store: Store,
    pub token: Uuid,
    pub can_register: bool,
}

/// Check an invite before registration, as its issuing owner.
///
/// `GET /api/invite/{token}/confirm`
///
/// Reaching 200 means the token is live and owned by the caller, so
/// `can_register` is always `true` here; dead states arrive as 409,
/// 410, or 403 instead.
pub async fn confirm(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(token): Path<Uuid>,
) -> Result<Json<ConfirmInviteResponse>, ApiError> {
    let service = InviteService::new(state.pool());
    let (store, invite) = service.confirm(token, current.id).await?;

    Ok(Json(ConfirmInviteResponse {
        store,
        token: invite.token,
        can_register: true,
    }))
}
