//! Password hashing using argon2
//!
//! New credentials are always hashed with Argon2id and a fresh random salt.
//! Verification also understands bcrypt hashes (`$2a$`, `$2b$`, `$2y$`)
//! carried over from accounts created by the previous system.
//!
//! # Performance Considerations
//!
//! Both schemes are intentionally CPU-intensive. Async callers should use
//! the `_async` variants, which run on the blocking thread pool.

use argon2::{
    password_hash::{self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Credential hashing and verification failures
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The supplied credential does not match the stored hash
    #[error("credential does not match")]
    Mismatch,

    /// The hash could not be produced or parsed
    #[error("credential hashing failed: {0}")]
    HashingFailure(String),
}

/// Hash used to burn the same verification time when no account matches
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| PasswordService::hash("devbook-timing-equaliser").ok());

/// Password hashing service
///
/// Uses Argon2id which is the recommended variant for password hashing.
/// It provides resistance against both side-channel and GPU-based attacks.
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using argon2 (blocking operation)
    pub fn hash(password: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CredentialError::HashingFailure(e.to_string()))
    }

    /// Hash a password on the blocking thread pool
    pub async fn hash_async(password: SecretString) -> Result<String, CredentialError> {
        tokio::task::spawn_blocking(move || Self::hash(password.expose_secret()))
            .await
            .map_err(|e| CredentialError::HashingFailure(format!("task join error: {}", e)))?
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// Parameters and salt are read from the stored hash, so hashes made
    /// with older work factors keep verifying.
    pub fn verify(stored_hash: &str, password: &str) -> Result<(), CredentialError> {
        if stored_hash.starts_with("$2") {
            return match bcrypt::verify(password, stored_hash) {
                Ok(true) => Ok(()),
                Ok(false) => Err(CredentialError::Mismatch),
                Err(e) => Err(CredentialError::HashingFailure(e.to_string())),
            };
        }

        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| CredentialError::HashingFailure(format!("invalid hash format: {}", e)))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(()),
            Err(password_hash::Error::Password) => Err(CredentialError::Mismatch),
            Err(e) => Err(CredentialError::HashingFailure(e.to_string())),
        }
    }

    /// Verify a password on the blocking thread pool
    pub async fn verify_async(
        stored_hash: String,
        password: SecretString,
    ) -> Result<(), CredentialError> {
        tokio::task::spawn_blocking(move || Self::verify(&stored_hash, password.expose_secret()))
            .await
            .map_err(|e| CredentialError::HashingFailure(format!("task join error: {}", e)))?
    }

    /// Spend a full verification on a dummy hash and report a mismatch.
    ///
    /// Used when no account exists for the supplied identity, so that the
    /// response time does not reveal whether the account exists.
    pub async fn reject_unknown_async(password: SecretString) -> Result<(), CredentialError> {
        if let Some(hash) = DUMMY_HASH.as_ref() {
            // Result is irrelevant; only the elapsed time matters
            let _ = Self::verify_async(hash.clone(), password).await;
        }
        Err(CredentialError::Mismatch)
    }
}
