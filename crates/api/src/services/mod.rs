//! Business logic services.
//!
//! Services own the rules; repositories own the SQL. Routes translate
//! between HTTP and the service vocabulary.

pub mod auth;
pub mod conversations;
pub mod invites;

pub use auth::{AuthError, AuthService, ManagerDetails, ManagerUpdate, OwnerRegistration};
pub use conversations::{ConversationSummary, summarize_store_conversations};
pub use invites::{InviteError, InviteInspection, InviteService};
