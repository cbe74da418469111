//! Authentication extractors for route handlers.
//!
//! Handlers declare their credential requirement through one of three
//! extractors. Object-level checks (which store, whose question) stay in
//! the handlers; these extractors only settle who is calling.

use axum::{extract::FromRequestParts, http::request::Parts};
use secrecy::ExposeSecret;
use subtle::ConstantTimeEq;
use tower_sessions::Session;

use crate::error::ApiError;
use crate::models::{CurrentUser, session::keys};
use crate::state::AppState;

/// Header carrying the pre-shared service secret for machine callers.
pub const API_SECRET_HEADER: &str = "x-api-secret";

async fn session_identity(parts: &Parts) -> Option<CurrentUser> {
    // The session is set in extensions by SessionManagerLayer
    let session = parts.extensions.get::<Session>()?;
    session.get(keys::CURRENT_USER).await.ok().flatten()
}

/// Extractor that requires a logged-in account.
///
/// # Example
///
/// ```rust,ignore
/// async fn whoami(RequireAuth(user): RequireAuth) -> Json<MeResponse> {
///     // user.id, user.username, user.role
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = session_identity(parts)
            .await
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_owned()))?;

        Ok(Self(user))
    }
}

/// Extractor that requires a staff account (manager or owner).
///
/// Missing credentials reject with 401; a logged-in buyer account
/// rejects with 403.
pub struct RequireStaff(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = session_identity(parts)
            .await
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_owned()))?;

        if !user.role.is_staff() {
            return Err(ApiError::PermissionDenied(
                "Staff access required".to_owned(),
            ));
        }

        Ok(Self(user))
    }
}

/// Extractor that accepts a session identity or the service secret.
///
/// A valid `X-API-SECRET` header authenticates the caller as the
/// anonymous integration service (`None` identity); it never stands in
/// for a specific account. Attached only to the ingestion and message
/// endpoints.
pub struct AuthOrApiSecret(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for AuthOrApiSecret {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = session_identity(parts).await {
            return Ok(Self(Some(user)));
        }

        let provided = parts
            .headers
            .get(API_SECRET_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_owned()))?;

        let expected = state.config().external_api_secret.expose_secret();
        let matches: bool = provided.as_bytes().ct_eq(expected.as_bytes()).into();
        if !matches {
            return Err(ApiError::Unauthorized("Authentication required".to_owned()));
        }

        Ok(Self(None))
    }
}

/// Helper to set the current account in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CURRENT_USER, user).await
}

/// Helper to clear the current account from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<CurrentUser>(keys::CURRENT_USER).await?;
    Ok(())
}
