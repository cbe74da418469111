//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::crypto::{CipherError, TokenCipher};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: PgPool,
    cipher: TokenCipher,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - API configuration
    /// * `pool` - `PostgreSQL` connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the integration token key is not valid
    /// AES-256-GCM key material.
    pub fn new(config: ApiConfig, pool: PgPool) -> Result<Self, CipherError> {
        let cipher = TokenCipher::new(&config.token_key)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                cipher,
            }),
        })
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the integration token cipher.
    #[must_use]
    pub fn cipher(&self) -> &TokenCipher {
        &self.inner.cipher
    }
}
