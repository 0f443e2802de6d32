//! Password hashing and verification
//!
//! Passwords are hashed with Argon2id and a per-call random salt before
//! storage. Verification recomputes the hash and compares inside the library,
//! which performs a constant-time comparison. No plaintext is retained past
//! the hashing call.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

/// Hash a plaintext password
///
/// Two calls with the same password produce different hashes (random salt),
/// but both verify correctly. Returns the PHC-format hash string.
///
/// # Errors
///
/// Returns an error if hashing fails (should not happen in normal operation)
pub fn hash_password(password: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HashError::HashFailed(e.to_string()))
}

/// Verify a plaintext password against a stored hash
///
/// Returns `false` for a wrong password or an unparsable stored hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Error type for password hashing operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HashError {
    /// Hashing failed
    #[error("Hash failed: {0}")]
    HashFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test 1: hash_password produces an argon2id PHC string
    #[test]
    fn test_hash_password_argon2id_format() {
        let hash = hash_password("secret1").unwrap();
        assert!(
            hash.starts_with("$argon2id$"),
            "Hash should be in Argon2id PHC format"
        );
    }

    // Test 2: same password produces different stored hashes (random salt)
    #[test]
    fn test_hash_password_unique_salts() {
        let hash1 = hash_password("secret1").unwrap();
        let hash2 = hash_password("secret1").unwrap();

        assert_ne!(
            hash1, hash2,
            "Same password should produce different hashes due to different salts"
        );
        assert!(verify_password("secret1", &hash1));
        assert!(verify_password("secret1", &hash2));
    }

    // Test 3: verify_password succeeds for matching password
    #[test]
    fn test_verify_password_success() {
        let hash = hash_password("secret1").unwrap();
        assert!(verify_password("secret1", &hash));
    }

    // Test 4: verify_password fails for wrong password
    #[test]
    fn test_verify_password_wrong_password() {
        let hash = hash_password("secret1").unwrap();
        assert!(!verify_password("secret2", &hash));
    }

    // Test 5: verify_password fails for invalid hash format
    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(!verify_password("secret1", "not_a_valid_hash"));
    }

    // Test 6: empty password still hashes and verifies consistently
    #[test]
    fn test_empty_password_roundtrip() {
        let hash = hash_password("").unwrap();
        assert!(verify_password("", &hash));
        assert!(!verify_password("x", &hash));
    }
}
