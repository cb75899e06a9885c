use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;

use crate::account::errors::AccountIdError;
use crate::account::errors::EmailError;
use crate::account::errors::UsernameError;

/// Account aggregate entity.
///
/// Represents a registered account. Accounts start out disabled and are
/// enabled exactly once, by a successful verification-token confirmation.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: AccountId,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

/// Account unique identifier type.
///
/// Database-generated numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub i64);

impl AccountId {
    /// Parse an account ID from string.
    ///
    /// # Arguments
    /// * `s` - Decimal string to parse
    ///
    /// # Returns
    /// Parsed AccountId
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid signed 64-bit integer
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        s.parse::<i64>()
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username is 3-32 characters and contains only alphanumeric, underscore, and hyphen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 32;

    /// Create a new valid username.
    ///
    /// Validates length and character constraints.
    ///
    /// # Arguments
    /// * `username` - Raw username string
    ///
    /// # Returns
    /// Validated Username value object
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 32 characters
    /// * `InvalidCharacters` - Contains non-alphanumeric characters (except _ and -)
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = Self::with_valid_length(username)?;
        let username = Self::with_valid_chars(username)?;
        Ok(Self(username))
    }

    fn with_valid_length(username: String) -> Result<String, UsernameError> {
        let length = username.len();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(username)
        }
    }

    fn with_valid_chars(username: String) -> Result<String, UsernameError> {
        if username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            Ok(username)
        } else {
            Err(UsernameError::InvalidCharacters)
        }
    }

    /// Get username as string slice.
    ///
    /// # Returns
    /// Username string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Arguments
    /// * `email` - Raw email string
    ///
    /// # Returns
    /// Validated EmailAddress value object
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    ///
    /// # Returns
    /// Email string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Account data for insertion; the id is database-generated.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Token unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenId(pub i64);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One-time email-confirmation credential.
///
/// Consumed (deleted) atomically when its account is verified.
#[derive(Debug, Clone)]
pub struct VerificationToken {
    pub id: TokenId,
    pub account_id: AccountId,
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

/// Verification token data for insertion; the id is database-generated.
#[derive(Debug, Clone)]
pub struct NewVerificationToken {
    pub account_id: AccountId,
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

/// Server-side session credential.
///
/// No expiration is modeled; rows live until externally pruned.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub id: TokenId,
    pub account_id: AccountId,
    pub value: String,
    pub created_at: DateTime<Utc>,
}

/// Session token data for insertion; the id is database-generated.
#[derive(Debug, Clone)]
pub struct NewSessionToken {
    pub account_id: AccountId,
    pub value: String,
    pub created_at: DateTime<Utc>,
}

/// Command to register a new account with domain types
#[derive(Debug)]
pub struct RegisterCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub password: String,
}

impl RegisterCommand {
    /// Construct a new register command.
    ///
    /// # Arguments
    /// * `username` - Validated username
    /// * `email` - Validated email address
    /// * `password` - Plain text password (will be hashed by service)
    ///
    /// # Returns
    /// RegisterCommand with validated fields
    pub fn new(username: Username, email: EmailAddress, password: String) -> Self {
        Self {
            username,
            email,
            password,
        }
    }
}
