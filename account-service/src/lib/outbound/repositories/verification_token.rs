use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use crate::account::errors::AuthError;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::NewVerificationToken;
use crate::domain::account::models::TokenId;
use crate::domain::account::models::VerificationToken;
use crate::domain::account::ports::VerificationTokenRepository;

pub struct PostgresVerificationTokenRepository {
    pool: PgPool,
}

impl PostgresVerificationTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct VerificationTokenRow {
    id: i64,
    account_id: i64,
    value: String,
    expires_at: DateTime<Utc>,
}

impl From<VerificationTokenRow> for VerificationToken {
    fn from(row: VerificationTokenRow) -> Self {
        Self {
            id: TokenId(row.id),
            account_id: AccountId(row.account_id),
            value: row.value,
            expires_at: row.expires_at,
        }
    }
}

#[async_trait]
impl VerificationTokenRepository for PostgresVerificationTokenRepository {
    async fn create(
        &self,
        new_token: NewVerificationToken,
    ) -> Result<VerificationToken, AuthError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO verification_tokens (account_id, value, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(new_token.account_id.0)
        .bind(&new_token.value)
        .bind(new_token.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(VerificationToken {
            id: TokenId(id),
            account_id: new_token.account_id,
            value: new_token.value,
            expires_at: new_token.expires_at,
        })
    }

    async fn find_by_value(&self, value: &str) -> Result<Option<VerificationToken>, AuthError> {
        let row = sqlx::query_as::<_, VerificationTokenRow>(
            r#"
            SELECT id, account_id, value, expires_at
            FROM verification_tokens
            WHERE value = $1
            "#,
        )
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(row.map(VerificationToken::from))
    }

    async fn consume(
        &self,
        token_id: &TokenId,
        account_id: &AccountId,
    ) -> Result<bool, AuthError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        // Delete first: zero affected rows means a concurrent call already
        // consumed the token, and the account must not be enabled again.
        let deleted = sqlx::query(
            r#"
            DELETE FROM verification_tokens
            WHERE id = $1
            "#,
        )
        .bind(token_id.0)
        .execute(&mut *tx)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        if deleted.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| AuthError::DatabaseError(e.to_string()))?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            UPDATE accounts
            SET enabled = TRUE
            WHERE id = $1
            "#,
        )
        .bind(account_id.0)
        .execute(&mut *tx)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(true)
    }
}
