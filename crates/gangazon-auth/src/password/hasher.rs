//! Argon2id password hashing and verification.
//!
//! The rest of the system treats this as an opaque
//! `hash(password) -> digest` / `verify(password, digest) -> bool`
//! primitive.

use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};

use gangazon_core::error::AppError;

/// Hashes credentials with Argon2id at the library's default cost
/// parameters.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes a plaintext password with a freshly generated salt. The
    /// salt and parameters travel inside the PHC-format digest.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
        Ok(digest.to_string())
    }

    /// Checks a plaintext password against a stored digest.
    ///
    /// A mismatch is `Ok(false)`; only an unparseable digest or a
    /// hashing fault is an error.
    pub fn verify_password(&self, password: &str, digest: &str) -> Result<bool, AppError> {
        let parsed = PasswordHash::new(digest)
            .map_err(|e| AppError::internal(format!("Stored password digest is invalid: {e}")))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hasher = PasswordHasher::new();
        let digest = hasher.hash_password("correct horse battery").unwrap();
        assert!(hasher.verify_password("correct horse battery", &digest).unwrap());
        assert!(!hasher.verify_password("wrong password", &digest).unwrap());
    }

    #[test]
    fn malformed_digest_is_an_error() {
        let hasher = PasswordHasher::new();
        assert!(hasher.verify_password("anything", "not-a-digest").is_err());
    }
}
