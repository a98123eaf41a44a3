use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// One-way credential hashing capability.
///
/// Services depend on this trait rather than on a concrete algorithm so the
/// usecases can be exercised with a hasher that fails on demand.
pub trait CredentialHasher: Send + Sync + 'static {
    /// Hash a plaintext password into a self-describing digest.
    ///
    /// # Errors
    /// * `HashingFailed` - The underlying algorithm rejected the input
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Check a plaintext password against a stored digest.
    ///
    /// Never fails: a mismatch and an unreadable digest both yield `false`.
    fn verify(&self, password: &str, digest: &str) -> bool;
}

/// Argon2id password hasher.
///
/// Produces PHC strings (`$argon2id$v=19$...`) carrying algorithm,
/// parameters and a random salt.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialHasher for PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    fn verify(&self, password: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
