use async_trait::async_trait;
use sqlx::PgPool;

use crate::account::errors::AuthError;
use crate::domain::account::models::NewSessionToken;
use crate::domain::account::models::SessionToken;
use crate::domain::account::models::TokenId;
use crate::domain::account::ports::SessionTokenRepository;

pub struct PostgresSessionTokenRepository {
    pool: PgPool,
}

impl PostgresSessionTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionTokenRepository for PostgresSessionTokenRepository {
    async fn create(&self, new_token: NewSessionToken) -> Result<SessionToken, AuthError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO session_tokens (account_id, value, created_at)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(new_token.account_id.0)
        .bind(&new_token.value)
        .bind(new_token.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(SessionToken {
            id: TokenId(id),
            account_id: new_token.account_id,
            value: new_token.value,
            created_at: new_token.created_at,
        })
    }
}
