use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by a signed account token.
///
/// A concrete, fully-typed payload: the account id as subject, the
/// username, and the issued-at/expiration instants. Every token this
/// service mints carries all four fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountClaims {
    /// Subject: the owning account id, as a decimal string
    pub sub: String,

    /// Username at issuance time
    pub username: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl AccountClaims {
    /// Build claims for an account with expiration `ttl_hours` from now.
    pub fn new(subject: impl ToString, username: &str, ttl_hours: i64) -> Self {
        let now = Utc::now();
        let expires = now + Duration::hours(ttl_hours);

        Self {
            sub: subject.to_string(),
            username: username.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        }
    }

    /// Check whether the claims are expired at `current_timestamp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
