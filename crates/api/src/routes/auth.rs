//! Owner self-registration and session authentication.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use sellerdesk_core::{Role, UserId};

use crate::error::{ApiError, clear_sentry_user, set_sentry_user};
use crate::middleware::RequireAuth;
use crate::middleware::auth::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::{AuthService, OwnerRegistration};
use crate::state::AppState;

/// Request body for owner self-registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: String,
    #[serde(default)]
    pub telegram_id: Option<i64>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    pub password: String,
    pub password_confirm: String,
    pub store_name: String,
}

/// Response body for a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: UserId,
}

/// Register a new owner together with their store.
///
/// `POST /api/register`
///
/// Only `role: "owner"` is accepted here; managers enter through the
/// invite flow. The account and its store are created in one
/// transaction, so a duplicate store code rolls back the user too.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let service = AuthService::new(state.pool());
    let (user, store) = service
        .register_owner(OwnerRegistration {
            username: &req.username,
            email: req.email.as_deref(),
            role: &req.role,
            telegram_id: req.telegram_id,
            contact_phone: req.contact_phone.as_deref(),
            password: &req.password,
            password_confirm: &req.password_confirm,
            store_name: &req.store_name,
        })
        .await?;

    tracing::info!(
        user_id = user.id.as_i32(),
        store_id = store.id.as_i32(),
        "Owner registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful".to_string(),
            user_id: user.id,
        }),
    ))
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
}

/// Authenticate with username and password, starting a session.
///
/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let service = AuthService::new(state.pool());
    let user = service.login(&req.username, &req.password).await?;

    let current = CurrentUser {
        id: user.id,
        username: user.username.clone(),
        role: user.role,
    };
    set_current_user(&session, &current)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to persist session: {e}")))?;
    set_sentry_user(user.id.as_i32(), &user.username);

    tracing::info!(user_id = user.id.as_i32(), role = %user.role, "User logged in");

    Ok(Json(LoginResponse {
        user_id: user.id,
        username: user.username,
        role: user.role,
    }))
}

/// Response body for logout.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// End the current session.
///
/// `POST /api/auth/logout`
///
/// Always returns 200; clearing an absent session is a no-op.
pub async fn logout(session: Session) -> Json<LogoutResponse> {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    // Also destroy the entire session
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    clear_sentry_user();

    Json(LogoutResponse {
        message: "Logged out".to_string(),
    })
}

/// Return the authenticated account's full profile.
///
/// `GET /api/auth/me`
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<User>, ApiError> {
    let service = AuthService::new(state.pool());
    let user = service.get_user(current.id).await?;

    // A session pointing at a deleted account is stale, not an internal error
    user.map_or(
        Err(ApiError::Unauthorized(
            "Authentication required".to_string(),
        )),
        |u| Ok(Json(u)),
    )
}
