//! Unified error handling for the API.
//!
//! Every handler returns [`ApiError`]; the `IntoResponse` impl renders the
//! JSON body `{"error": "..."}` the dashboard and bots consume.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, InviteError};

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing input.
    #[error("{0}")]
    Validation(String),

    /// No credential where one is required.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not entitled.
    #[error("{0}")]
    PermissionDenied(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// State precondition violated (consumed token, duplicate pair).
    #[error("{0}")]
    Conflict(String),

    /// Terminal expiry of an invite token.
    #[error("{0}")]
    Expired(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Map repository outcomes onto the HTTP taxonomy in one place, so route
/// code can use plain `?`.
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("Resource not found".to_string()),
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Database(other),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidEmail(e) => Self::Validation(format!("Invalid email: {e}")),
            AuthError::InvalidCredentials => {
                Self::Unauthorized("Invalid username or password".to_string())
            }
            AuthError::NotAnOwnerRegistration => {
                Self::Validation("Only owner accounts can self-register".to_string())
            }
            AuthError::WeakPassword(msg) => Self::Validation(msg),
            AuthError::PasswordMismatch => Self::Validation("Passwords do not match".to_string()),
            AuthError::EmptyUsername => {
                Self::Validation("Username must not be empty".to_string())
            }
            AuthError::ManagerNotFound => Self::NotFound("Manager not found".to_string()),
            AuthError::Repository(e) => e.into(),
            AuthError::PasswordHash => Self::Internal("password hashing failed".to_string()),
        }
    }
}

impl From<InviteError> for ApiError {
    fn from(err: InviteError) -> Self {
        match err {
            InviteError::StoreNotFound => Self::NotFound("Store not found".to_string()),
            InviteError::UnknownToken => Self::NotFound("Invite token not found".to_string()),
            InviteError::NotOwner => {
                Self::PermissionDenied("You do not own this store".to_string())
            }
            InviteError::InvalidOrUsed => Self::Validation("Invalid or used token".to_string()),
            InviteError::AlreadyUsed => {
                Self::Conflict("Invite token has already been used".to_string())
            }
            InviteError::Expired => Self::Expired("Invite token has expired".to_string()),
            InviteError::InvalidEmail(e) => Self::Validation(format!("Invalid email: {e}")),
            InviteError::EmptyUsername => {
                Self::Validation("Username must not be empty".to_string())
            }
            InviteError::Repository(e) => e.into(),
            InviteError::PasswordHash => Self::Internal("password hashing failed".to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "API request error"
            );
        }

        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Expired(_) => StatusCode::GONE,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Set the Sentry user context after login or session load.
pub fn set_sentry_user(user_id: i32, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
