//! Password hashing and verification.

use bcrypt::{hash, verify, DEFAULT_COST};
use once_cell::sync::Lazy;

use crate::errors::{DomainError, DomainResult};

// Hash of a fixed throwaway value, used to equalize the cost of login
// attempts against unknown usernames
static DUMMY_HASH: Lazy<String> =
    Lazy::new(|| hash("timing-equalization-input", DEFAULT_COST).unwrap_or_default());

/// Hashes a password for storage
pub fn hash_password(password: &str) -> DomainResult<String> {
    hash(password, DEFAULT_COST).map_err(|e| DomainError::Internal {
        message: format!("Password hashing failed: {}", e),
    })
}

/// Verifies a password against a stored hash
pub fn verify_password(password: &str, password_hash: &str) -> DomainResult<bool> {
    verify(password, password_hash).map_err(|e| DomainError::Internal {
        message: format!("Password verification failed: {}", e),
    })
}

/// Runs a full bcrypt verification against a dummy hash
///
/// Called when the username is unknown so that the unknown-user and
/// wrong-password paths take comparable time.
pub fn verify_dummy(password: &str) {
    let _ = verify(password, &DUMMY_HASH);
}
