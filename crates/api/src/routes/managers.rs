//! Manager administration routes, owner-only.
//!
//! All of `/api/managers` operates on the calling owner's store; a
//! manager ID belonging to another store is indistinguishable from a
//! missing one.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use sellerdesk_core::{Role, StoreId, UserId};

use crate::db::StoreRepository;
use crate::error::ApiError;
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, Store, User};
use crate::services::{AuthService, ManagerDetails, ManagerUpdate};
use crate::state::AppState;

/// Resolve the caller's store, requiring the owner role.
async fn owner_store(state: &AppState, current: &CurrentUser) -> Result<Store, ApiError> {
    if current.role != Role::Owner {
        return Err(ApiError::PermissionDenied(
            "Owner access required".to_string(),
        ));
    }
    super::resolve_store(state, current).await
}

/// List the managers of the caller's store.
///
/// `GET /api/managers`
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<Vec<User>>, ApiError> {
    let store = owner_store(&state, &current).await?;
    let managers = AuthService::new(state.pool())
        .list_managers(store.id)
        .await?;
    Ok(Json(managers))
}

/// Request body for manager creation.
#[derive(Debug, Deserialize)]
pub struct CreateManagerRequest {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telegram_id: Option<i64>,
    #[serde(default)]
    pub contact_phone: Option<String>,
}

/// Response body for manager creation.
#[derive(Debug, Serialize)]
pub struct CreatedManagerResponse {
    pub message: String,
    pub user_id: UserId,
    pub username: String,
    pub generated_password: String,
}

/// Create a manager in the caller's store with a generated password.
///
/// `POST /api/managers`
///
/// The password appears in this response and nowhere else.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(req): Json<CreateManagerRequest>,
) -> Result<(StatusCode, Json<CreatedManagerResponse>), ApiError> {
    let store = owner_store(&state, &current).await?;
    let (manager, generated_password) = AuthService::new(state.pool())
        .provision_manager(
            store.id,
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
        store_id = store.id.as_i32(),
        "Manager created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreatedManagerResponse {
            message: "Manager created".to_string(),
            user_id: manager.id,
            username: manager.username,
            generated_password,
        }),
    ))
}

/// Create a manager in an explicitly named store.
///
/// `POST /api/owners/{store_id}/invite-manager`
///
/// Same effect as `POST /api/managers`, but addressed by store, which
/// lets the denial distinguish an absent store (404) from a foreign one
/// (403).
pub async fn invite_manager(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(store_id): Path<StoreId>,
    Json(req): Json<CreateManagerRequest>,
) -> Result<(StatusCode, Json<CreatedManagerResponse>), ApiError> {
    let store = StoreRepository::new(state.pool())
        .get(store_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Store not found".to_string()))?;
    if !store.is_owned_by(current.id) {
        return Err(ApiError::PermissionDenied(
            "You do not own this store".to_string(),
        ));
    }

    let (manager, generated_password) = AuthService::new(state.pool())
        .provision_manager(
            store.id,
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
        store_id = store.id.as_i32(),
        "Manager created by direct invite"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreatedManagerResponse {
            message: "Manager created".to_string(),
            user_id: manager.id,
            username: manager.username,
            generated_password,
        }),
    ))
}

/// Get one manager of the caller's store.
///
/// `GET /api/managers/{id}`
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<UserId>,
) -> Result<Json<User>, ApiError> {
    let store = owner_store(&state, &current).await?;
    let manager = AuthService::new(state.pool())
        .get_manager(store.id, id)
        .await?;
    Ok(Json(manager))
}

/// Request body for a manager update. Absent fields keep their values.
#[derive(Debug, Deserialize)]
pub struct UpdateManagerRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub telegram_id: Option<i64>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Update a manager's profile, and reset the password when one is given.
///
/// `PUT /api/managers/{id}`
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<UserId>,
    Json(req): Json<UpdateManagerRequest>,
) -> Result<Json<User>, ApiError> {
    let store = owner_store(&state, &current).await?;
    let manager = AuthService::new(state.pool())
        .update_manager(
            store.id,
            id,
            ManagerUpdate {
                email: req.email.as_deref(),
                contact_phone: req.contact_phone.as_deref(),
                telegram_id: req.telegram_id,
                password: req.password.as_deref(),
            },
        )
        .await?;
    Ok(Json(manager))
}

/// Remove a manager from the caller's store.
///
/// `DELETE /api/managers/{id}`
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<UserId>,
) -> Result<StatusCode, ApiError> {
    let store = owner_store(&state, &current).await?;
    AuthService::new(state.pool())
        .delete_manager(store.id, id)
        .await?;

    tracing::info!(
        manager_id = id.as_i32(),
        store_id = store.id.as_i32(),
        "Manager removed"
    );

    Ok(StatusCode::NO_CONTENT)
}
