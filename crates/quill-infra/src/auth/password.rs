//! Argon2 password hashing implementation.

use argon2::{
    Argon2,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use quill_core::ports::{AuthError, PasswordService};

/// Argon2id password service producing PHC-format hashes.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;

        // Only a mismatch is a "no"; anything else means the stored hash is unusable
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::HashingError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let service = Argon2PasswordService::new();

        let hash = service.hash("secret1").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(service.verify("secret1", &hash).unwrap());
        assert!(!service.verify("secret2", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let service = Argon2PasswordService::new();

        let first = service.hash("secret1").unwrap();
        let second = service.hash("secret1").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let service = Argon2PasswordService::new();

        let result = service.verify("secret1", "not-a-phc-string");
        assert!(matches!(result, Err(AuthError::HashingError(_))));
    }
}
