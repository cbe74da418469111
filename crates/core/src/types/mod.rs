//! Core types for Sellerdesk.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod invite;
pub mod marketplace;
pub mod preview;
pub mod role;

pub use email::{Email, EmailError};
pub use id::*;
pub use invite::{InviteStatus, InviteStatusError};
pub use marketplace::{Marketplace, MarketplaceError};
pub use preview::{DECODE_FAILURE_PREVIEW, mask_secret};
pub use role::{Role, RoleError, SenderRole};
