//! Sellerdesk Core - Shared domain types.
//!
//! This crate provides common types used across all Sellerdesk components:
//! - `api` - The REST API server for the seller back-office
//! - `cli` - Command-line tools for migrations and account bootstrap
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, the role and marketplace vocabularies,
//!   invite token states, and secret preview masking

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
