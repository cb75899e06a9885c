//! Authentication infrastructure library
//!
//! Provides the credential and token primitives used by the account
//! service:
//! - Password hashing (Argon2id)
//! - Credential verification against stored hashes
//! - Signed token issuance and validation (JWT, HS256)
//!
//! The service layer owns the orchestration; this crate only knows about
//! passwords, hashes, and claims.
//!
//! # Examples
//!
//! ## Credential verification
//! ```
//! use auth::CredentialVerifier;
//!
//! let verifier = CredentialVerifier::new();
//! let hash = verifier.hash_password("my_password").unwrap();
//! assert!(verifier.verify("my_password", &hash).is_ok());
//! assert!(verifier.verify("not_my_password", &hash).is_err());
//! ```
//!
//! ## Signed tokens
//! ```
//! use auth::JwtTokenService;
//!
//! let tokens = JwtTokenService::new(b"secret_key_at_least_32_bytes_long!", 24);
//! let token = tokens.generate_token(42, "alice").unwrap();
//! let claims = tokens.decode(&token).unwrap();
//! assert_eq!(claims.sub, "42");
//! assert_eq!(claims.username, "alice");
//! ```

pub mod jwt;
pub mod password;
pub mod verifier;

// Re-export commonly used items
pub use jwt::AccountClaims;
pub use jwt::JwtError;
pub use jwt::JwtTokenService;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use verifier::CredentialError;
pub use verifier::CredentialVerifier;
