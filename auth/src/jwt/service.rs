use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::AccountClaims;
use super::errors::JwtError;

/// Signed-token issuer.
///
/// Mints and validates stateless account tokens with HS256. The
/// expiration policy lives here: callers hand over an identity, not a
/// lifetime.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    expiration_hours: i64,
}

impl JwtTokenService {
    /// Create a token service from a signing secret and token lifetime.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], expiration_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            expiration_hours,
        }
    }

    /// Mint a signed token for an account.
    ///
    /// # Arguments
    /// * `subject` - Owning account id
    /// * `username` - Username to embed in the claims
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn generate_token(
        &self,
        subject: impl ToString,
        username: &str,
    ) -> Result<String, JwtError> {
        let claims = AccountClaims::new(subject, username, self.expiration_hours);
        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Validate a token's signature and expiration and return its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - The `exp` claim is in the past
    /// * `InvalidToken` - Signature mismatch
    /// * `DecodingFailed` - Token is malformed
    pub fn decode(&self, token: &str) -> Result<AccountClaims, JwtError> {
        let validation = Validation::new(self.algorithm);

        let token_data =
            decode::<AccountClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                    ErrorKind::InvalidSignature => {
                        JwtError::InvalidToken("signature mismatch".to_string())
                    }
                    _ => JwtError::DecodingFailed(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}
