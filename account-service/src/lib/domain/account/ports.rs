use async_trait::async_trait;

use crate::account::errors::AuthError;
use crate::account::models::Username;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::NewAccount;
use crate::domain::account::models::NewSessionToken;
use crate::domain::account::models::NewVerificationToken;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::SessionToken;
use crate::domain::account::models::TokenId;
use crate::domain::account::models::UserAccount;
use crate::domain::account::models::VerificationToken;

/// Port for authentication domain service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new disabled account and issue its verification token.
    ///
    /// # Arguments
    /// * `command` - Validated command containing username, email, and password
    ///
    /// # Returns
    /// Created account together with its verification token
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn register(
        &self,
        command: RegisterCommand,
    ) -> Result<(UserAccount, VerificationToken), AuthError>;

    /// Issue a fresh verification token for an account.
    ///
    /// # Arguments
    /// * `account` - Persisted account the token belongs to
    ///
    /// # Returns
    /// Persisted verification token expiring 24 hours from now
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn issue_verification_token(
        &self,
        account: &UserAccount,
    ) -> Result<VerificationToken, AuthError>;

    /// Confirm a verification token and enable its account.
    ///
    /// Unknown token values and broken account references are soft
    /// failures, not errors.
    ///
    /// # Arguments
    /// * `token_value` - Opaque token value received by the account holder
    ///
    /// # Returns
    /// True if the account was enabled, false otherwise
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn verify_account(&self, token_value: &str) -> Result<bool, AuthError>;

    /// Authenticate with username and password, minting a signed token.
    ///
    /// # Arguments
    /// * `username` - Validated username
    /// * `password` - Plain text password
    ///
    /// # Returns
    /// Signed stateless token string
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password
    /// * `AccountNotVerified` - Account has not confirmed its email yet
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, username: &Username, password: &str) -> Result<String, AuthError>;

    /// Authenticate with username and password, opening a server-side session.
    ///
    /// # Arguments
    /// * `username` - Validated username
    /// * `password` - Plain text password
    ///
    /// # Returns
    /// Opaque session token value
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password
    /// * `AccountNotVerified` - Account has not confirmed its email yet
    /// * `DatabaseError` - Database operation failed
    async fn login_session(&self, username: &Username, password: &str)
        -> Result<String, AuthError>;

    /// Retrieve an account by unique identifier.
    ///
    /// # Arguments
    /// * `id` - Account ID
    ///
    /// # Returns
    /// Account entity
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_account(&self, id: &AccountId) -> Result<UserAccount, AuthError>;
}

/// Persistence operations for the account aggregate.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist a new account to storage.
    ///
    /// # Arguments
    /// * `new_account` - Account data to insert
    ///
    /// # Returns
    /// Created account entity with its database-generated id
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, new_account: NewAccount) -> Result<UserAccount, AuthError>;

    /// Retrieve an account by identifier.
    ///
    /// # Arguments
    /// * `id` - Account ID
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<UserAccount>, AuthError>;

    /// Retrieve an account by username.
    ///
    /// # Arguments
    /// * `username` - Username to search for
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &Username)
        -> Result<Option<UserAccount>, AuthError>;
}

/// Persistence operations for verification tokens.
#[async_trait]
pub trait VerificationTokenRepository: Send + Sync + 'static {
    /// Persist a new verification token.
    ///
    /// # Arguments
    /// * `new_token` - Token data to insert
    ///
    /// # Returns
    /// Created token entity with its database-generated id
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, new_token: NewVerificationToken)
        -> Result<VerificationToken, AuthError>;

    /// Retrieve a verification token by its opaque value.
    ///
    /// # Arguments
    /// * `value` - Opaque token value
    ///
    /// # Returns
    /// Optional token entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_value(&self, value: &str) -> Result<Option<VerificationToken>, AuthError>;

    /// Consume a verification token and enable its account.
    ///
    /// Deletes the token row and flips the account's enabled flag inside a
    /// single transaction. The delete happens first; zero affected rows
    /// means the token was already consumed and the account is left
    /// untouched.
    ///
    /// # Arguments
    /// * `token_id` - Token to consume
    /// * `account_id` - Account to enable
    ///
    /// # Returns
    /// True if the token was consumed and the account enabled, false if the
    /// token row was already gone
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn consume(&self, token_id: &TokenId, account_id: &AccountId)
        -> Result<bool, AuthError>;
}

/// Persistence operations for session tokens.
#[async_trait]
pub trait SessionTokenRepository: Send + Sync + 'static {
    /// Persist a new session token.
    ///
    /// # Arguments
    /// * `new_token` - Token data to insert
    ///
    /// # Returns
    /// Created token entity with its database-generated id
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, new_token: NewSessionToken) -> Result<SessionToken, AuthError>;
}
