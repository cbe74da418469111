//! Middleware for the API server.

pub mod auth;
pub mod session;

pub use auth::{AuthOrApiSecret, RequireAuth, RequireStaff};
pub use session::create_session_layer;
