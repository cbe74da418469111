//! HTTP route handlers for the seller dashboard API.
//!
//! # Route Structure
//!
//! ```text
//! # Registration & sessions
//! POST /api/register                  - Owner self-registration (creates store)
//! POST /api/auth/login                - Start a session
//! POST /api/auth/logout               - End the session
//! GET  /api/auth/me                   - Current session identity
//!
//! # Invites (owner issues, candidate consumes)
//! POST /api/owners/{store_id}/generate-invite - Issue an invite link
//! POST /api/owners/{store_id}/invite-manager  - Create a manager directly
//! GET  /api/invite/{token}            - Inspect an invite (no auth)
//! POST /api/invite/{token}            - Consume an invite, create the manager
//! GET  /api/invite/{token}/confirm    - Pre-consumption check for the issuing owner
//!
//! # Managers (owner only, scoped to the owner's store)
//! GET  /api/managers                  - List managers
//! POST /api/managers                  - Create a manager with a generated password
//! GET  /api/managers/{id}             - Manager detail
//! PUT  /api/managers/{id}             - Update profile / reset password
//! DELETE /api/managers/{id}           - Remove a manager
//!
//! # Marketplace tokens (owner only)
//! GET  /api/stores/{store_id}/marketplace-tokens                - List (masked previews)
//! POST /api/stores/{store_id}/marketplace-tokens                - Store a secret
//! GET  /api/stores/{store_id}/marketplace-tokens/{marketplace}  - Detail (masked)
//! PUT  /api/stores/{store_id}/marketplace-tokens/{marketplace}  - Replace the secret
//! DELETE /api/stores/{store_id}/marketplace-tokens/{marketplace} - Delete
//!
//! # Products (staff, scoped to the caller's store)
//! GET  /api/products                  - List products
//! POST /api/products                  - Create a product
//! GET  /api/products/{id}             - Product detail
//! PUT  /api/products/{id}             - Update a product
//! DELETE /api/products/{id}           - Delete a product
//!
//! # Questions, messages, answers
//! GET  /api/questions                 - Buyers see their own, staff see all
//! POST /api/questions                 - Ask a question
//! GET  /api/questions/{id}            - Question detail
//! GET  /api/messages                  - Thread messages (staff only)
//! POST /api/messages                  - Append to a thread (session or X-API-SECRET)
//! GET  /api/answers                   - All answers (staff)
//! POST /api/answers                   - Answer a question
//! GET  /api/answers/by-user/{user_id} - Answers to one buyer's questions
//!
//! # External ingestion & aggregation
//! POST /api/external/questions        - Ingest a marketplace question (X-API-SECRET)
//! GET  /api/conversations?external_id= - Questions with ordered messages for a buyer
//! GET  /api/shop_users                - Buyer conversation windows for the caller's store
//! ```
//!
//! Trailing slashes are stripped by a `NormalizePathLayer` in `main`, so
//! `/api/managers/` and `/api/managers` hit the same handler.

pub mod auth;
pub mod conversations;
pub mod invites;
pub mod managers;
pub mod marketplace_tokens;
pub mod products;
pub mod questions;

use axum::{
    Router,
    routing::{get, post},
};

use crate::db::StoreRepository;
use crate::error::ApiError;
use crate::models::{CurrentUser, Store};
use crate::state::AppState;

/// Resolve the store a session identity acts on.
///
/// Owners resolve through store ownership, managers through their
/// assignment. Buyers have no store, which surfaces as a 403 rather
/// than a 404: the resource exists, the caller just has no seat.
///
/// Every store-scoped handler funnels through here.
pub(crate) async fn resolve_store(
    state: &AppState,
    user: &CurrentUser,
) -> Result<Store, ApiError> {
    StoreRepository::new(state.pool())
        .resolve_for_identity(user.id, user.role)
        .await?
        .ok_or_else(|| ApiError::PermissionDenied("You are not attached to a store".to_string()))
}

/// Create the session auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the owner-action routes router.
pub fn owner_routes() -> Router<AppState> {
    Router::new()
        .route("/{store_id}/generate-invite", post(invites::generate))
        .route("/{store_id}/invite-manager", post(managers::invite_manager))
}

/// Create the invite lifecycle routes router.
pub fn invite_routes() -> Router<AppState> {
    Router::new()
        .route("/{token}", get(invites::inspect).post(invites::consume))
        .route("/{token}/confirm", get(invites::confirm))
}

/// Create the manager administration routes router.
pub fn manager_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(managers::index).post(managers::create))
        .route(
            "/{id}",
            get(managers::show)
                .put(managers::update)
                .delete(managers::remove),
        )
}

/// Create the marketplace token routes router (nested under `/api/stores`).
pub fn marketplace_token_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{store_id}/marketplace-tokens",
            get(marketplace_tokens::index).post(marketplace_tokens::create),
        )
        .route(
            "/{store_id}/marketplace-tokens/{marketplace}",
            get(marketplace_tokens::show)
                .put(marketplace_tokens::update)
                .delete(marketplace_tokens::remove),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::remove),
        )
}

/// Create the question routes router.
pub fn question_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(questions::index).post(questions::create))
        .route("/{id}", get(questions::show))
}

/// Create the answer routes router.
pub fn answer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(questions::list_answers).post(questions::create_answer),
        )
        .route("/by-user/{user_id}", get(questions::answers_by_user))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Owner self-registration
        .route("/api/register", post(auth::register))
        // Session auth
        .nest("/api/auth", auth_routes())
        // Owner actions on a named store
        .nest("/api/owners", owner_routes())
        // Invite lifecycle
        .nest("/api/invite", invite_routes())
        // Manager administration
        .nest("/api/managers", manager_routes())
        // Marketplace tokens
        .nest("/api/stores", marketplace_token_routes())
        // Products
        .nest("/api/products", product_routes())
        // Questions / messages / answers
        .nest("/api/questions", question_routes())
        .route(
            "/api/messages",
            get(questions::list_messages).post(questions::create_message),
        )
        .nest("/api/answers", answer_routes())
        // External ingestion
        .route("/api/external/questions", post(questions::ingest_external))
        // Aggregation
        .route("/api/conversations", get(conversations::index))
        .route("/api/shop_users", get(conversations::shop_users))
}
