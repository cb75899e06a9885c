use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Credential verifier backing the login flows.
///
/// Wraps the password hasher behind a verify-or-raise contract: a
/// mismatched password is an error, not a boolean, so callers cannot
/// forget to check the result.
pub struct CredentialVerifier {
    hasher: PasswordHasher,
}

/// Credential verification errors.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),
}

impl CredentialVerifier {
    /// Create a new verifier with the default Argon2id parameters.
    pub fn new() -> Self {
        Self {
            hasher: PasswordHasher::new(),
        }
    }

    /// Hash a plaintext password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.hasher.hash(password)
    }

    /// Verify a plaintext password against a stored hash.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match the stored hash
    /// * `Password` - Stored hash is malformed or verification failed
    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<(), CredentialError> {
        if self.hasher.verify(password, stored_hash)? {
            Ok(())
        } else {
            Err(CredentialError::InvalidCredentials)
        }
    }
}

impl Default for CredentialVerifier {
    fn default() -> Self {
        Self::new()
    }
}
