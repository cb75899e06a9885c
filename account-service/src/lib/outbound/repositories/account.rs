use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use crate::account::errors::AuthError;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::NewAccount;
use crate::domain::account::models::UserAccount;
use crate::domain::account::models::Username;
use crate::domain::account::ports::AccountRepository;

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    enabled: bool,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> Result<UserAccount, AuthError> {
        Ok(UserAccount {
            id: AccountId(self.id),
            username: Username::new(self.username)?,
            email: EmailAddress::new(self.email)?,
            password_hash: self.password_hash,
            enabled: self.enabled,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(&self, new_account: NewAccount) -> Result<UserAccount, AuthError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO accounts (username, email, password_hash, enabled, created_at)
            VALUES ($1, $2, $3, FALSE, $4)
            RETURNING id
            "#,
        )
        .bind(new_account.username.as_str())
        .bind(new_account.email.as_str())
        .bind(&new_account.password_hash)
        .bind(new_account.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    if db_err.constraint() == Some("accounts_username_key") {
                        return AuthError::UsernameAlreadyExists(
                            new_account.username.as_str().to_string(),
                        );
                    }
                    if db_err.constraint() == Some("accounts_email_key") {
                        return AuthError::EmailAlreadyExists(
                            new_account.email.as_str().to_string(),
                        );
                    }
                }
            }
            AuthError::DatabaseError(e.to_string())
        })?;

        Ok(UserAccount {
            id: AccountId(id),
            username: new_account.username,
            email: new_account.email,
            password_hash: new_account.password_hash,
            enabled: false,
            created_at: new_account.created_at,
        })
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<UserAccount>, AuthError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, username, email, password_hash, enabled, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, AuthError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, username, email, password_hash, enabled, created_at
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(AccountRow::into_account).transpose()
    }
}
