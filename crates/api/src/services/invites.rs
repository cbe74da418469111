//! Invite token lifecycle service.
//!
//! Owns the rules around issuing, inspecting, confirming, and consuming
//! manager invites. Ordering of the denials is part of the contract:
//! ownership is checked before token state, so a foreign owner probing a
//! token learns nothing about whether it was used.

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use sellerdesk_core::{Email, StoreId, UserId};

use crate::db::RepositoryError;
use crate::db::invites::InviteRepository;
use crate::db::stores::StoreRepository;
use crate::db::users::NewManager;
use crate::models::{InviteToken, Store, User};

use super::auth::{ManagerDetails, generate_password, hash_password};

/// Errors that can occur during invite operations.
#[derive(Debug, thiserror::Error)]
pub enum InviteError {
    /// Store does not exist.
    #[error("store not found")]
    StoreNotFound,

    /// Token does not exist.
    #[error("invite token not found")]
    UnknownToken,

    /// Caller is not the owner of the token's store.
    #[error("you do not own this store")]
    NotOwner,

    /// Anonymous inspection of a token that is unknown or already used.
    /// The two cases are indistinguishable on purpose.
    #[error("invalid or used token")]
    InvalidOrUsed,

    /// Token was already consumed.
    #[error("invite token has already been used")]
    AlreadyUsed,

    /// Token is past its lifetime.
    #[error("invite token has expired")]
    Expired,

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] sellerdesk_core::EmailError),

    /// Username missing or blank.
    #[error("username must not be empty")]
    EmptyUsername,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

/// Anonymous view of an invite, served to the registration page.
#[derive(Debug, Clone, Serialize)]
pub struct InviteInspection {
    pub store_id: StoreId,
    pub store_name: String,
    pub token_valid: bool,
    pub is_expired: bool,
    pub token: Uuid,
}

/// Invite token lifecycle service.
pub struct InviteService<'a> {
    invites: InviteRepository<'a>,
    stores: StoreRepository<'a>,
}

impl<'a> InviteService<'a> {
    /// Create a new invite service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            invites: InviteRepository::new(pool),
            stores: StoreRepository::new(pool),
        }
    }

    /// Issue a fresh invite for a store on behalf of its owner.
    ///
    /// # Errors
    ///
    /// Returns `InviteError::StoreNotFound` for an absent store and
    /// `InviteError::NotOwner` when the requester does not own it.
    #[instrument(skip(self))]
    pub async fn issue(
        &self,
        store_id: StoreId,
        requester_id: UserId,
    ) -> Result<InviteToken, InviteError> {
        let store = self
            .stores
            .get(store_id)
            .await?
            .ok_or(InviteError::StoreNotFound)?;

        if !store.is_owned_by(requester_id) {
            return Err(InviteError::NotOwner);
        }

        Ok(self.invites.issue(store_id).await?)
    }

    /// Inspect an invite without authentication.
    ///
    /// Unknown and consumed tokens are collapsed into one error so a
    /// lookup cannot reveal store metadata for dead tokens. An expired
    /// token still returns its metadata; the caller renders it as
    /// unusable via the flags.
    ///
    /// # Errors
    ///
    /// Returns `InviteError::InvalidOrUsed` for unknown or consumed
    /// tokens.
    pub async fn inspect(&self, token: Uuid) -> Result<InviteInspection, InviteError> {
        let invite = self
            .invites
            .get_by_token(token)
            .await?
            .ok_or(InviteError::InvalidOrUsed)?;

        if invite.is_consumed() {
            return Err(InviteError::InvalidOrUsed);
        }

        let store = self
            .stores
            .get(invite.store_id)
            .await?
            .ok_or(InviteError::InvalidOrUsed)?;

        let now = Utc::now();
        Ok(InviteInspection {
            store_id: store.id,
            store_name: store.name,
            token_valid: invite.is_valid_at(now),
            is_expired: invite.is_expired_at(now),
            token: invite.token,
        })
    }

    /// Owner-side pre-registration check of an invite.
    ///
    /// # Errors
    ///
    /// Returns `InviteError::UnknownToken`, `InviteError::NotOwner`,
    /// `InviteError::AlreadyUsed`, or `InviteError::Expired` following
    /// the same denial order as consumption.
    pub async fn confirm(
        &self,
        token: Uuid,
        requester_id: UserId,
    ) -> Result<(Store, InviteToken), InviteError> {
        let (invite, store) = self.load_for_owner(token, requester_id).await?;

        if invite.is_consumed() {
            return Err(InviteError::AlreadyUsed);
        }
        if invite.is_expired_at(Utc::now()) {
            return Err(InviteError::Expired);
        }

        Ok((store, invite))
    }

    /// Consume an invite, creating the manager account it admits.
    ///
    /// Returns the new account and its generated plaintext credential;
    /// the credential is returned exactly once and never stored.
    ///
    /// Denial order: unknown token, foreign owner, already used,
    /// expired, then input validation. The final claim runs as a
    /// compare-and-set inside the repository transaction, so a
    /// concurrent double-submit loses with `AlreadyUsed` even if both
    /// passed the checks above.
    ///
    /// # Errors
    ///
    /// See the denial order above; infrastructure failures surface as
    /// `InviteError::Repository`.
    #[instrument(skip(self, details), fields(username = details.username))]
    pub async fn consume(
        &self,
        token: Uuid,
        requester_id: UserId,
        details: ManagerDetails<'_>,
    ) -> Result<(User, String), InviteError> {
        let (invite, _store) = self.load_for_owner(token, requester_id).await?;

        if invite.is_consumed() {
            return Err(InviteError::AlreadyUsed);
        }
        if invite.is_expired_at(Utc::now()) {
            return Err(InviteError::Expired);
        }

        if details.username.trim().is_empty() {
            return Err(InviteError::EmptyUsername);
        }
        let email = details.email.map(Email::parse).transpose()?;

        let password = generate_password();
        let password_hash = hash_password(&password).map_err(|_| InviteError::PasswordHash)?;

        // A lost CAS race propagates as the repository's conflict and
        // renders with the same status as the pre-check above.
        let user = self
            .invites
            .consume(
                token,
                NewManager {
                    username: details.username,
                    email: email.as_ref(),
                    password_hash: &password_hash,
                    contact_phone: details.contact_phone,
                    telegram_id: details.telegram_id,
                },
            )
            .await?;

        Ok((user, password))
    }

    /// Resolve a token and its store, verifying the requester owns it.
    ///
    /// Ownership is checked before any state so the error itself cannot
    /// leak whether a foreign token is used or live.
    async fn load_for_owner(
        &self,
        token: Uuid,
        requester_id: UserId,
    ) -> Result<(InviteToken, Store), InviteError> {
        let invite = self
            .invites
            .get_by_token(token)
            .await?
            .ok_or(InviteError::UnknownToken)?;

        let store = self
            .stores
            .get(invite.store_id)
            .await?
            .ok_or(InviteError::UnknownToken)?;

        if !store.is_owned_by(requester_id) {
            return Err(InviteError::NotOwner);
        }

        Ok((invite, store))
    }
}
