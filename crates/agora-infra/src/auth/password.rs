//! Password storage for registered accounts.
//!
//! Hashes are PHC strings (`$argon2id$v=19$...`), so the salt and cost
//! parameters travel with the stored value.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use agora_core::ports::{AuthError, PasswordService};

/// Argon2id with the crate's default cost parameters.
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
        let phc = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(hashing_error)?;

        Ok(phc.to_string())
    }

    /// `Ok(false)` is a wrong password; `Err` means the stored hash is unreadable.
    fn verify(&self, password: &str, stored: &str) -> Result<bool, AuthError> {
        let phc = PasswordHash::new(stored).map_err(hashing_error)?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &phc)
            .is_ok())
    }
}

fn hashing_error(err: argon2::password_hash::Error) -> AuthError {
    AuthError::HashingError(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let service = Argon2PasswordService::new();

        let hash = service.hash("testtest").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(service.verify("testtest", &hash).unwrap());
        assert!(!service.verify("wrongpass", &hash).unwrap());
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let service = Argon2PasswordService::new();

        let first = service.hash("testtest").unwrap();
        let second = service.hash("testtest").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let service = Argon2PasswordService::new();

        assert!(matches!(
            service.verify("testtest", "not-a-phc-string"),
            Err(AuthError::HashingError(_))
        ));
    }
}
