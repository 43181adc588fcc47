//! Password hashing with Argon2id.

use crate::AuthError;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hashes and verifies account passwords.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    /// Shortest password accepted on registration or change.
    pub min_length: usize,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { min_length: 6 }
    }
}

impl PasswordHasher {
    /// Hash a password.
    ///
    /// Returns a PHC string: `$argon2id$v=19$...`
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        self.validate_password(password)?;
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hash(e.to_string()))
    }

    /// Verify a password against a stored hash.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hash(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Validate password length.
    pub fn validate_password(&self, password: &str) -> Result<(), AuthError> {
        if password.chars().count() < self.min_length {
            return Err(AuthError::WeakPassword(format!(
                "Password must be at least {} characters",
                self.min_length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let hasher = PasswordHasher::default();
        let hash = hasher.hash("vendor123").unwrap();
        assert!(hash.starts_with("$argon2id$"));

        assert!(hasher.verify("vendor123", &hash).unwrap());
        assert!(!hasher.verify("vendor124", &hash).unwrap());
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let hasher = PasswordHasher::default();
        let hash1 = hasher.hash("admin123").unwrap();
        let hash2 = hasher.hash("admin123").unwrap();

        assert_ne!(hash1, hash2);
        assert!(hasher.verify("admin123", &hash1).unwrap());
        assert!(hasher.verify("admin123", &hash2).unwrap());
    }

    #[test]
    fn test_short_password_rejected() {
        let hasher = PasswordHasher::default();
        assert!(matches!(hasher.hash("abc"), Err(AuthError::WeakPassword(_))));
    }

    #[test]
    fn test_malformed_hash() {
        let hasher = PasswordHasher::default();
        assert!(matches!(
            hasher.verify("admin123", "not-a-hash"),
            Err(AuthError::Hash(_))
        ));
    }
}
