//! Domain types for the API.
//!
//! These types represent validated domain objects separate from database
//! row types, which live next to their repositories in [`crate::db`].

pub mod integration_token;
pub mod invite;
pub mod product;
pub mod question;
pub mod session;
pub mod store;
pub mod user;

pub use integration_token::IntegrationToken;
pub use invite::{INVITE_TTL_DAYS, InviteToken};
pub use product::Product;
pub use question::{Question, QuestionAnswer, QuestionMessage};
pub use session::CurrentUser;
pub use store::Store;
pub use user::User;
