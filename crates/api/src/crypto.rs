//! Encryption for stored marketplace secrets.
//!
//! Secrets are sealed with AES-256-GCM under a single process-wide key and
//! stored as `base64(nonce || ciphertext)`. The key comes from
//! `SELLERDESK_TOKEN_KEY` and is injected once at startup; nothing else in
//! the codebase touches raw key material.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, AeadCore, KeyInit, OsRng},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// AES-256 key length in bytes.
const KEY_LEN: usize = 32;

/// AES-GCM nonce length in bytes.
const NONCE_LEN: usize = 12;

/// Errors from sealing or unsealing a secret.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The configured key is not base64 of exactly 32 bytes.
    #[error("token key must be base64 of exactly {KEY_LEN} bytes")]
    InvalidKey,

    /// Sealing failed.
    #[error("could not encrypt secret")]
    Encrypt,

    /// The stored value is malformed, was sealed under another key, or was
    /// tampered with. Callers render a masked placeholder and move on; the
    /// distinction is deliberately not surfaced.
    #[error("could not decrypt stored secret")]
    Decrypt,
}

/// Process-wide cipher for marketplace API secrets.
#[derive(Clone)]
pub struct TokenCipher {
    cipher: Aes256Gcm,
}

impl TokenCipher {
    /// Build a cipher from the base64-encoded key in configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKey`] if the value does not decode to
    /// exactly 32 bytes. This is checked at startup so a misconfigured key
    /// fails before the server binds.
    pub fn new(key: &SecretString) -> Result<Self, CipherError> {
        let bytes = STANDARD
            .decode(key.expose_secret())
            .map_err(|_| CipherError::InvalidKey)?;
        if bytes.len() != KEY_LEN {
            return Err(CipherError::InvalidKey);
        }
        let cipher = Aes256Gcm::new_from_slice(&bytes).map_err(|_| CipherError::InvalidKey)?;
        Ok(Self { cipher })
    }

    /// Seal a plaintext secret for storage.
    ///
    /// A fresh random nonce is drawn per call, so sealing the same secret
    /// twice yields different ciphertexts.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Encrypt`] if the underlying AEAD rejects the
    /// input.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let sealed = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CipherError::Encrypt)?;

        let mut raw = nonce.to_vec();
        raw.extend_from_slice(&sealed);
        Ok(STANDARD.encode(raw))
    }

    /// Unseal a stored secret.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::Decrypt`] on bad base64, truncated input, a
    /// wrong key, corrupted ciphertext, or non-UTF-8 plaintext. All five
    /// collapse into one variant on purpose.
    pub fn decrypt(&self, stored: &str) -> Result<String, CipherError> {
        let raw = STANDARD.decode(stored).map_err(|_| CipherError::Decrypt)?;
        let (nonce_bytes, sealed) = raw
            .split_at_checked(NONCE_LEN)
            .ok_or(CipherError::Decrypt)?;
        let nonce_array: [u8; NONCE_LEN] =
            nonce_bytes.try_into().map_err(|_| CipherError::Decrypt)?;
        let nonce = Nonce::from(nonce_array);

        let plaintext = self
            .cipher
            .decrypt(&nonce, sealed)
            .map_err(|_| CipherError::Decrypt)?;
        String::from_utf8(plaintext).map_err(|_| CipherError::Decrypt)
    }
}

impl std::fmt::Debug for TokenCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCipher").finish_non_exhaustive()
    }
}
