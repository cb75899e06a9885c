use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::models::UserAccount;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::middleware::AuthenticatedAccount;
use crate::inbound::http::router::AppState;

pub async fn get_account_me(
    State(state): State<AppState>,
    Extension(authenticated): Extension<AuthenticatedAccount>,
) -> Result<ApiSuccess<GetAccountResponseData>, ApiError> {
    state
        .auth_service
        .get_account(&authenticated.account_id)
        .await
        .map_err(ApiError::from)
        .map(|ref account| ApiSuccess::new(StatusCode::OK, account.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetAccountResponseData {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&UserAccount> for GetAccountResponseData {
    fn from(account: &UserAccount) -> Self {
        Self {
            id: account.id.0,
            username: account.username.as_str().to_string(),
            email: account.email.as_str().to_string(),
            enabled: account.enabled,
            created_at: account.created_at,
        }
    }
}
