//! Authentication and account provisioning service.
//!
//! Owner self-registration, session login, and owner-driven manager
//! provisioning. Managers never pick their first password; a credential
//! is generated here, returned once in the creation response, and only
//! its argon2 hash is stored.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rand::Rng;
use rand::distr::Alphanumeric;
use sqlx::PgPool;

use sellerdesk_core::{Email, StoreId, UserId};

use crate::db::RepositoryError;
use crate::db::users::{NewManager, NewOwner, UserRepository};
use crate::models::{Store, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Length of server-generated manager credentials.
const GENERATED_PASSWORD_LENGTH: usize = 12;

/// Errors that can occur during authentication operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] sellerdesk_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Registration asked for a role other than owner.
    #[error("only owner accounts can self-register")]
    NotAnOwnerRegistration,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Username missing or blank.
    #[error("username must not be empty")]
    EmptyUsername,

    /// Manager not found in the caller's store.
    #[error("manager not found")]
    ManagerNotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

/// Input for owner self-registration.
#[derive(Debug, Clone, Copy)]
pub struct OwnerRegistration<'a> {
    pub username: &'a str,
    pub email: Option<&'a str>,
    /// Requested role string; anything but `"owner"` is rejected.
    pub role: &'a str,
    pub telegram_id: Option<i64>,
    pub contact_phone: Option<&'a str>,
    pub password: &'a str,
    pub password_confirm: &'a str,
    pub store_name: &'a str,
}

/// Profile fields for a manager account provisioned by an owner.
#[derive(Debug, Clone, Copy)]
pub struct ManagerDetails<'a> {
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub contact_phone: Option<&'a str>,
    pub telegram_id: Option<i64>,
}

/// Partial update of a manager's profile; absent fields stay unchanged.
#[derive(Debug, Clone, Copy)]
pub struct ManagerUpdate<'a> {
    pub email: Option<&'a str>,
    pub contact_phone: Option<&'a str>,
    pub telegram_id: Option<i64>,
    pub password: Option<&'a str>,
}

/// Authentication service.
///
/// Handles registration, login, and manager account provisioning.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register an owner account together with its store.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAnOwnerRegistration` for any other role,
    /// `AuthError::WeakPassword` / `AuthError::PasswordMismatch` for bad
    /// credentials, and `AuthError::Repository` with a conflict when the
    /// username is taken.
    pub async fn register_owner(
        &self,
        registration: OwnerRegistration<'_>,
    ) -> Result<(User, Store), AuthError> {
        if registration.role != "owner" {
            return Err(AuthError::NotAnOwnerRegistration);
        }

        if registration.username.trim().is_empty() {
            return Err(AuthError::EmptyUsername);
        }

        validate_password(registration.password)?;
        if registration.password != registration.password_confirm {
            return Err(AuthError::PasswordMismatch);
        }

        let email = registration.email.map(Email::parse).transpose()?;
        let password_hash = hash_password(registration.password)?;

        let (user, store) = self
            .users
            .create_owner_with_store(
                NewOwner {
                    username: registration.username,
                    email: email.as_ref(),
                    password_hash: &password_hash,
                    contact_phone: registration.contact_phone,
                    telegram_id: registration.telegram_id,
                },
                registration.store_name,
                None,
            )
            .await?;

        Ok((user, store))
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password
    /// pair is wrong. Unknown accounts and wrong passwords are not
    /// distinguishable from the outside.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let (user, password_hash) = self
            .users
            .get_with_credentials(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn get_user(&self, user_id: UserId) -> Result<Option<User>, AuthError> {
        Ok(self.users.get(user_id).await?)
    }

    /// Create a manager account in a store with a generated credential.
    ///
    /// Returns the account and the plaintext credential; the credential
    /// is not retrievable afterwards.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmptyUsername` / `AuthError::InvalidEmail` on
    /// bad input, or `AuthError::Repository` with a conflict when the
    /// username or telegram ID is taken.
    pub async fn provision_manager(
        &self,
        store_id: StoreId,
        details: ManagerDetails<'_>,
    ) -> Result<(User, String), AuthError> {
        if details.username.trim().is_empty() {
            return Err(AuthError::EmptyUsername);
        }

        let email = details.email.map(Email::parse).transpose()?;
        let password = generate_password();
        let password_hash = hash_password(&password)?;

        let user = self
            .users
            .create_manager(
                store_id,
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

    /// List the managers of a store.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn list_managers(&self, store_id: StoreId) -> Result<Vec<User>, AuthError> {
        Ok(self.users.list_managers(store_id).await?)
    }

    /// Get one manager of a store.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ManagerNotFound` if no such manager exists in
    /// the store.
    pub async fn get_manager(&self, store_id: StoreId, id: UserId) -> Result<User, AuthError> {
        self.users
            .get_manager(store_id, id)
            .await?
            .ok_or(AuthError::ManagerNotFound)
    }

    /// Update a manager's profile, and password when one is supplied.
    ///
    /// Absent fields keep their current values.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ManagerNotFound` if no such manager exists in
    /// the store, `AuthError::WeakPassword` for a bad new password, or
    /// `AuthError::Repository` with a conflict for a taken telegram ID.
    pub async fn update_manager(
        &self,
        store_id: StoreId,
        id: UserId,
        update: ManagerUpdate<'_>,
    ) -> Result<User, AuthError> {
        let current = self
            .users
            .get_manager(store_id, id)
            .await?
            .ok_or(AuthError::ManagerNotFound)?;

        let email = match update.email {
            Some(raw) => Some(Email::parse(raw)?),
            None => current.email,
        };
        let contact_phone = update
            .contact_phone
            .map(ToOwned::to_owned)
            .or(current.contact_phone);
        let telegram_id = update.telegram_id.or(current.telegram_id);

        let user = self
            .users
            .update_manager_profile(
                store_id,
                id,
                email.as_ref(),
                contact_phone.as_deref(),
                telegram_id,
            )
            .await?;

        if let Some(password) = update.password {
            validate_password(password)?;
            let password_hash = hash_password(password)?;
            self.users.set_password_hash(id, &password_hash).await?;
        }

        Ok(user)
    }

    /// Delete a manager from a store.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ManagerNotFound` if no such manager exists in
    /// the store.
    pub async fn delete_manager(&self, store_id: StoreId, id: UserId) -> Result<(), AuthError> {
        if self.users.delete_manager(store_id, id).await? {
            Ok(())
        } else {
            Err(AuthError::ManagerNotFound)
        }
    }
}

/// Validate password meets requirements.
pub(crate) fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Generate a random alphanumeric credential for a provisioned account.
///
/// Also used by the CLI's owner bootstrap, which prints the credential
/// exactly once.
#[must_use]
pub fn generate_password() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
pub(crate) fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("12345678").is_ok());
        assert!(matches!(
            validate_password("1234567"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(matches!(
            validate_password(""),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_generated_password_shape() {
        let password = generate_password();
        assert_eq!(password.len(), GENERATED_PASSWORD_LENGTH);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generated_passwords_differ() {
        assert_ne!(generate_password(), generate_password());
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("battery staple", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
