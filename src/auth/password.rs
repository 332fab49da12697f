//! Password hashing and verification (bcrypt).

use crate::error::{AppError, AppResult};
use bcrypt::BcryptError;
use std::sync::OnceLock;

/// bcrypt cost factor: 2^10 rounds.
pub const HASH_COST: u32 = 10;

/// Longest input bcrypt hashes without truncation.
pub const MAX_PASSWORD_BYTES: usize = 72;

const DUMMY_PASSWORD: &str = "not-a-real-password";

pub struct CredentialHasher;

impl CredentialHasher {
    /// Hash a plaintext password with a fresh random salt.
    ///
    /// bcrypt only reads the first 72 bytes of its input, so longer passwords
    /// are rejected instead of being silently cut.
    pub fn hash(password: &str) -> AppResult<String> {
        bcrypt::non_truncating_hash(password, HASH_COST).map_err(|e| match e {
            BcryptError::Truncation(len) => AppError::Validation(format!(
                "password: must be at most {} bytes, got {}",
                MAX_PASSWORD_BYTES, len
            )),
            other => AppError::Internal(anyhow::anyhow!("hash: {}", other)),
        })
    }

    /// Check a plaintext password against a stored hash. A mismatch is `Ok(false)`;
    /// only an unparseable stored hash is an error.
    pub fn verify(password: &str, hash: &str) -> AppResult<bool> {
        match bcrypt::non_truncating_verify(password, hash) {
            Ok(matched) => Ok(matched),
            // `hash` never accepted a password this long.
            Err(BcryptError::Truncation(_)) => Ok(false),
            Err(e) => Err(AppError::Internal(anyhow::anyhow!("parse hash: {}", e))),
        }
    }

    /// Spend the same work as a real verification, for lookups that found no user.
    pub fn verify_dummy(password: &str) {
        static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
        let hash = DUMMY_HASH.get_or_init(|| bcrypt::hash(DUMMY_PASSWORD, HASH_COST).ok());
        if let Some(hash) = hash {
            let _ = bcrypt::non_truncating_verify(password, hash);
        }
    }
}
