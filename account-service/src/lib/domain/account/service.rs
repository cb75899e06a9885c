use std::sync::Arc;

use async_trait::async_trait;
use auth::CredentialError;
use auth::CredentialVerifier;
use auth::JwtTokenService;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use crate::account::errors::AuthError;
use crate::account::ports::AccountRepository;
use crate::account::ports::AuthServicePort;
use crate::account::ports::SessionTokenRepository;
use crate::account::ports::VerificationTokenRepository;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::NewAccount;
use crate::domain::account::models::NewSessionToken;
use crate::domain::account::models::NewVerificationToken;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::UserAccount;
use crate::domain::account::models::Username;
use crate::domain::account::models::VerificationToken;

const VERIFICATION_TOKEN_TTL_HOURS: i64 = 24;

/// Domain service implementation for authentication operations.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<AR, VR, SR>
where
    AR: AccountRepository,
    VR: VerificationTokenRepository,
    SR: SessionTokenRepository,
{
    accounts: Arc<AR>,
    verification_tokens: Arc<VR>,
    session_tokens: Arc<SR>,
    credential_verifier: Arc<CredentialVerifier>,
    token_service: Arc<JwtTokenService>,
}

impl<AR, VR, SR> AuthService<AR, VR, SR>
where
    AR: AccountRepository,
    VR: VerificationTokenRepository,
    SR: SessionTokenRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `accounts` - Account persistence implementation
    /// * `verification_tokens` - Verification token persistence implementation
    /// * `session_tokens` - Session token persistence implementation
    /// * `credential_verifier` - Password hashing and verification
    /// * `token_service` - Signed token issuer
    ///
    /// # Returns
    /// Configured auth service instance
    pub fn new(
        accounts: Arc<AR>,
        verification_tokens: Arc<VR>,
        session_tokens: Arc<SR>,
        credential_verifier: Arc<CredentialVerifier>,
        token_service: Arc<JwtTokenService>,
    ) -> Self {
        Self {
            accounts,
            verification_tokens,
            session_tokens,
            credential_verifier,
            token_service,
        }
    }

    /// Load an account by username and check its password and enabled flag.
    ///
    /// Unknown usernames fold into `InvalidCredentials` so the boundary
    /// cannot leak which usernames exist.
    async fn authenticate_account(
        &self,
        username: &Username,
        password: &str,
    ) -> Result<UserAccount, AuthError> {
        let account = self
            .accounts
            .find_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        self.credential_verifier
            .verify(password, &account.password_hash)
            .map_err(|e| match e {
                CredentialError::InvalidCredentials => AuthError::InvalidCredentials,
                CredentialError::Password(err) => AuthError::Password(err),
            })?;

        if !account.enabled {
            return Err(AuthError::AccountNotVerified(username.to_string()));
        }

        Ok(account)
    }
}

#[async_trait]
impl<AR, VR, SR> AuthServicePort for AuthService<AR, VR, SR>
where
    AR: AccountRepository,
    VR: VerificationTokenRepository,
    SR: SessionTokenRepository,
{
    async fn register(
        &self,
        command: RegisterCommand,
    ) -> Result<(UserAccount, VerificationToken), AuthError> {
        let password_hash = self.credential_verifier.hash_password(&command.password)?;

        let new_account = NewAccount {
            username: command.username,
            email: command.email,
            password_hash,
            created_at: Utc::now(),
        };

        let account = self.accounts.create(new_account).await?;
        let token = self.issue_verification_token(&account).await?;

        tracing::info!(
            account_id = %account.id,
            username = %account.username,
            "Account registered"
        );

        Ok((account, token))
    }

    async fn issue_verification_token(
        &self,
        account: &UserAccount,
    ) -> Result<VerificationToken, AuthError> {
        let new_token = NewVerificationToken {
            account_id: account.id,
            value: Uuid::new_v4().to_string(),
            expires_at: Utc::now() + Duration::hours(VERIFICATION_TOKEN_TTL_HOURS),
        };

        self.verification_tokens.create(new_token).await
    }

    async fn verify_account(&self, token_value: &str) -> Result<bool, AuthError> {
        let token = match self.verification_tokens.find_by_value(token_value).await? {
            Some(token) => token,
            None => return Ok(false),
        };

        let account = match self.accounts.find_by_id(&token.account_id).await? {
            Some(account) => account,
            None => return Ok(false),
        };

        // TODO: reject tokens past expires_at once a token re-issue endpoint exists
        let verified = self
            .verification_tokens
            .consume(&token.id, &account.id)
            .await?;

        if verified {
            tracing::info!(account_id = %account.id, "Account verified");
        }

        Ok(verified)
    }

    async fn login(&self, username: &Username, password: &str) -> Result<String, AuthError> {
        let account = self.authenticate_account(username, password).await?;

        let token = self
            .token_service
            .generate_token(account.id.0, account.username.as_str())?;

        Ok(token)
    }

    async fn login_session(
        &self,
        username: &Username,
        password: &str,
    ) -> Result<String, AuthError> {
        let account = self.authenticate_account(username, password).await?;

        let new_token = NewSessionToken {
            account_id: account.id,
            value: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        };

        let session = self.session_tokens.create(new_token).await?;

        Ok(session.value)
    }

    async fn get_account(&self, id: &AccountId) -> Result<UserAccount, AuthError> {
        self.accounts
            .find_by_id(id)
            .await?
            .ok_or(AuthError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::account::models::EmailAddress;
    use crate::domain::account::models::SessionToken;
    use crate::domain::account::models::TokenId;

    // Define mocks in the test module using mockall
    mock! {
        pub TestAccountRepository {}

        #[async_trait]
        impl AccountRepository for TestAccountRepository {
            async fn create(&self, new_account: NewAccount) -> Result<UserAccount, AuthError>;
            async fn find_by_id(&self, id: &AccountId) -> Result<Option<UserAccount>, AuthError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<UserAccount>, AuthError>;
        }
    }

    mock! {
        pub TestVerificationTokenRepository {}

        #[async_trait]
        impl VerificationTokenRepository for TestVerificationTokenRepository {
            async fn create(&self, new_token: NewVerificationToken) -> Result<VerificationToken, AuthError>;
            async fn find_by_value(&self, value: &str) -> Result<Option<VerificationToken>, AuthError>;
            async fn consume(&self, token_id: &TokenId, account_id: &AccountId) -> Result<bool, AuthError>;
        }
    }

    mock! {
        pub TestSessionTokenRepository {}

        #[async_trait]
        impl SessionTokenRepository for TestSessionTokenRepository {
            async fn create(&self, new_token: NewSessionToken) -> Result<SessionToken, AuthError>;
        }
    }

    const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

    fn service(
        accounts: MockTestAccountRepository,
        verification_tokens: MockTestVerificationTokenRepository,
        session_tokens: MockTestSessionTokenRepository,
    ) -> AuthService<
        MockTestAccountRepository,
        MockTestVerificationTokenRepository,
        MockTestSessionTokenRepository,
    > {
        AuthService::new(
            Arc::new(accounts),
            Arc::new(verification_tokens),
            Arc::new(session_tokens),
            Arc::new(CredentialVerifier::new()),
            Arc::new(JwtTokenService::new(TEST_JWT_SECRET, 24)),
        )
    }

    fn account_with_password(id: i64, username: &str, password: &str) -> UserAccount {
        let password_hash = CredentialVerifier::new()
            .hash_password(password)
            .expect("Failed to hash password");

        UserAccount {
            id: AccountId(id),
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(format!("{}@example.com", username)).unwrap(),
            password_hash,
            enabled: true,
            created_at: Utc::now(),
        }
    }

    fn verification_token(id: i64, account_id: i64) -> VerificationToken {
        VerificationToken {
            id: TokenId(id),
            account_id: AccountId(account_id),
            value: Uuid::new_v4().to_string(),
            expires_at: Utc::now() + Duration::hours(24),
        }
    }

    #[tokio::test]
    async fn test_register_creates_disabled_account_with_hashed_password() {
        let mut accounts = MockTestAccountRepository::new();
        let mut verification_tokens = MockTestVerificationTokenRepository::new();
        let session_tokens = MockTestSessionTokenRepository::new();

        accounts
            .expect_create()
            .withf(|new_account| {
                new_account.username.as_str() == "testuser"
                    && new_account.email.as_str() == "test@example.com"
                    && new_account.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|new_account| {
                Ok(UserAccount {
                    id: AccountId(1),
                    username: new_account.username,
                    email: new_account.email,
                    password_hash: new_account.password_hash,
                    enabled: false,
                    created_at: new_account.created_at,
                })
            });

        verification_tokens
            .expect_create()
            .withf(|new_token| new_token.account_id == AccountId(1) && !new_token.value.is_empty())
            .times(1)
            .returning(|new_token| {
                Ok(VerificationToken {
                    id: TokenId(1),
                    account_id: new_token.account_id,
                    value: new_token.value,
                    expires_at: new_token.expires_at,
                })
            });

        let service = service(accounts, verification_tokens, session_tokens);

        let command = RegisterCommand {
            username: Username::new("testuser".to_string()).unwrap(),
            email: EmailAddress::new("test@example.com".to_string()).unwrap(),
            password: "password123".to_string(),
        };

        let (account, token) = service.register(command).await.expect("register failed");

        assert!(!account.enabled);
        // Password is hashed with real Argon2
        assert!(account.password_hash.starts_with("$argon2"));
        assert_eq!(token.account_id, account.id);
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let mut accounts = MockTestAccountRepository::new();
        let mut verification_tokens = MockTestVerificationTokenRepository::new();
        let session_tokens = MockTestSessionTokenRepository::new();

        accounts.expect_create().times(1).returning(|new_account| {
            Err(AuthError::UsernameAlreadyExists(
                new_account.username.as_str().to_string(),
            ))
        });

        verification_tokens.expect_create().times(0);

        let service = service(accounts, verification_tokens, session_tokens);

        let command = RegisterCommand {
            username: Username::new("testuser".to_string()).unwrap(),
            email: EmailAddress::new("test2@example.com".to_string()).unwrap(),
            password: "password456".to_string(),
        };

        let result = service.register(command).await;
        assert!(matches!(
            result.unwrap_err(),
            AuthError::UsernameAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_issue_verification_token_expires_in_24_hours() {
        let accounts = MockTestAccountRepository::new();
        let mut verification_tokens = MockTestVerificationTokenRepository::new();
        let session_tokens = MockTestSessionTokenRepository::new();

        verification_tokens
            .expect_create()
            .withf(|new_token| {
                let ttl = new_token.expires_at - Utc::now();
                ttl > Duration::hours(23) && ttl <= Duration::hours(24)
            })
            .times(1)
            .returning(|new_token| {
                Ok(VerificationToken {
                    id: TokenId(1),
                    account_id: new_token.account_id,
                    value: new_token.value,
                    expires_at: new_token.expires_at,
                })
            });

        let service = service(accounts, verification_tokens, session_tokens);
        let account = account_with_password(7, "testuser", "password123");

        let token = service
            .issue_verification_token(&account)
            .await
            .expect("issue failed");

        assert_eq!(token.account_id, AccountId(7));
        assert!(!token.value.is_empty());
    }

    #[tokio::test]
    async fn test_verify_account_unknown_token_is_soft_failure() {
        let accounts = MockTestAccountRepository::new();
        let mut verification_tokens = MockTestVerificationTokenRepository::new();
        let session_tokens = MockTestSessionTokenRepository::new();

        verification_tokens
            .expect_find_by_value()
            .times(1)
            .returning(|_| Ok(None));
        verification_tokens.expect_consume().times(0);

        let service = service(accounts, verification_tokens, session_tokens);

        let result = service.verify_account("no-such-token").await;
        assert_eq!(result.unwrap(), false);
    }

    #[tokio::test]
    async fn test_verify_account_missing_account_is_soft_failure() {
        let mut accounts = MockTestAccountRepository::new();
        let mut verification_tokens = MockTestVerificationTokenRepository::new();
        let session_tokens = MockTestSessionTokenRepository::new();

        let token = verification_token(1, 42);
        let token_value = token.value.clone();

        verification_tokens
            .expect_find_by_value()
            .times(1)
            .returning(move |_| Ok(Some(token.clone())));
        verification_tokens.expect_consume().times(0);

        accounts
            .expect_find_by_id()
            .withf(|id| *id == AccountId(42))
            .times(1)
            .returning(|_| Ok(None));

        let service = service(accounts, verification_tokens, session_tokens);

        let result = service.verify_account(&token_value).await;
        assert_eq!(result.unwrap(), false);
    }

    #[tokio::test]
    async fn test_verify_account_success() {
        let mut accounts = MockTestAccountRepository::new();
        let mut verification_tokens = MockTestVerificationTokenRepository::new();
        let session_tokens = MockTestSessionTokenRepository::new();

        let token = verification_token(9, 42);
        let token_value = token.value.clone();

        let mut account = account_with_password(42, "testuser", "password123");
        account.enabled = false;

        verification_tokens
            .expect_find_by_value()
            .times(1)
            .returning(move |_| Ok(Some(token.clone())));

        accounts
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        verification_tokens
            .expect_consume()
            .withf(|token_id, account_id| *token_id == TokenId(9) && *account_id == AccountId(42))
            .times(1)
            .returning(|_, _| Ok(true));

        let service = service(accounts, verification_tokens, session_tokens);

        let result = service.verify_account(&token_value).await;
        assert_eq!(result.unwrap(), true);
    }

    #[tokio::test]
    async fn test_verify_account_already_consumed() {
        let mut accounts = MockTestAccountRepository::new();
        let mut verification_tokens = MockTestVerificationTokenRepository::new();
        let session_tokens = MockTestSessionTokenRepository::new();

        let token = verification_token(9, 42);
        let token_value = token.value.clone();
        let account = account_with_password(42, "testuser", "password123");

        verification_tokens
            .expect_find_by_value()
            .times(1)
            .returning(move |_| Ok(Some(token.clone())));

        accounts
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        // The row was deleted by a concurrent verification
        verification_tokens
            .expect_consume()
            .times(1)
            .returning(|_, _| Ok(false));

        let service = service(accounts, verification_tokens, session_tokens);

        let result = service.verify_account(&token_value).await;
        assert_eq!(result.unwrap(), false);
    }

    #[tokio::test]
    async fn test_login_success_returns_decodable_token() {
        let mut accounts = MockTestAccountRepository::new();
        let verification_tokens = MockTestVerificationTokenRepository::new();
        let session_tokens = MockTestSessionTokenRepository::new();

        let account = account_with_password(42, "testuser", "password123");
        accounts
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        let service = service(accounts, verification_tokens, session_tokens);

        let username = Username::new("testuser".to_string()).unwrap();
        let token = service
            .login(&username, "password123")
            .await
            .expect("login failed");

        let claims = JwtTokenService::new(TEST_JWT_SECRET, 24)
            .decode(&token)
            .expect("Failed to decode token");
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "testuser");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut accounts = MockTestAccountRepository::new();
        let verification_tokens = MockTestVerificationTokenRepository::new();
        let session_tokens = MockTestSessionTokenRepository::new();

        let account = account_with_password(42, "testuser", "correct_password");
        accounts
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        let service = service(accounts, verification_tokens, session_tokens);

        let username = Username::new("testuser".to_string()).unwrap();
        let result = service.login(&username, "wrong_password").await;

        assert!(matches!(result.unwrap_err(), AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_username_folds_into_invalid_credentials() {
        let mut accounts = MockTestAccountRepository::new();
        let verification_tokens = MockTestVerificationTokenRepository::new();
        let session_tokens = MockTestSessionTokenRepository::new();

        accounts
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(accounts, verification_tokens, session_tokens);

        let username = Username::new("nonexistent".to_string()).unwrap();
        let result = service.login(&username, "password123").await;

        assert!(matches!(result.unwrap_err(), AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_disabled_account_is_rejected() {
        let mut accounts = MockTestAccountRepository::new();
        let verification_tokens = MockTestVerificationTokenRepository::new();
        let session_tokens = MockTestSessionTokenRepository::new();

        let mut account = account_with_password(42, "testuser", "password123");
        account.enabled = false;
        accounts
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        let service = service(accounts, verification_tokens, session_tokens);

        let username = Username::new("testuser".to_string()).unwrap();
        let result = service.login(&username, "password123").await;

        assert!(matches!(
            result.unwrap_err(),
            AuthError::AccountNotVerified(_)
        ));
    }

    #[tokio::test]
    async fn test_login_session_persists_one_token() {
        let mut accounts = MockTestAccountRepository::new();
        let verification_tokens = MockTestVerificationTokenRepository::new();
        let mut session_tokens = MockTestSessionTokenRepository::new();

        let account = account_with_password(42, "testuser", "password123");
        accounts
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        session_tokens
            .expect_create()
            .withf(|new_token| new_token.account_id == AccountId(42) && !new_token.value.is_empty())
            .times(1)
            .returning(|new_token| {
                Ok(SessionToken {
                    id: TokenId(1),
                    account_id: new_token.account_id,
                    value: new_token.value,
                    created_at: new_token.created_at,
                })
            });

        let service = service(accounts, verification_tokens, session_tokens);

        let username = Username::new("testuser".to_string()).unwrap();
        let value = service
            .login_session(&username, "password123")
            .await
            .expect("session login failed");

        // UUID v4 canonical form
        assert_eq!(value.len(), 36);
    }

    #[tokio::test]
    async fn test_login_session_wrong_password_persists_nothing() {
        let mut accounts = MockTestAccountRepository::new();
        let verification_tokens = MockTestVerificationTokenRepository::new();
        let mut session_tokens = MockTestSessionTokenRepository::new();

        let account = account_with_password(42, "testuser", "correct_password");
        accounts
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        session_tokens.expect_create().times(0);

        let service = service(accounts, verification_tokens, session_tokens);

        let username = Username::new("testuser".to_string()).unwrap();
        let result = service.login_session(&username, "wrong_password").await;

        assert!(matches!(result.unwrap_err(), AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_get_account_success() {
        let mut accounts = MockTestAccountRepository::new();
        let verification_tokens = MockTestVerificationTokenRepository::new();
        let session_tokens = MockTestSessionTokenRepository::new();

        let account = account_with_password(42, "testuser", "password123");
        accounts
            .expect_find_by_id()
            .withf(|id| *id == AccountId(42))
            .times(1)
            .returning(move |_| Ok(Some(account.clone())));

        let service = service(accounts, verification_tokens, session_tokens);

        let found = service
            .get_account(&AccountId(42))
            .await
            .expect("get_account failed");
        assert_eq!(found.id, AccountId(42));
        assert_eq!(found.username.as_str(), "testuser");
    }

    #[tokio::test]
    async fn test_get_account_not_found() {
        let mut accounts = MockTestAccountRepository::new();
        let verification_tokens = MockTestVerificationTokenRepository::new();
        let session_tokens = MockTestSessionTokenRepository::new();

        accounts
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(accounts, verification_tokens, session_tokens);

        let result = service.get_account(&AccountId(999)).await;
        assert!(matches!(result.unwrap_err(), AuthError::NotFound(_)));
    }
}
