use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::EmailError;
use crate::account::errors::UsernameError;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::UserAccount;
use crate::domain::account::models::Username;
use crate::domain::account::models::VerificationToken;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|(ref account, ref token)| {
            ApiSuccess::new(StatusCode::CREATED, (account, token).into())
        })
}

/// HTTP request body for registering an account (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    username: String,
    email_address: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ParseRegisterRequestError> {
        let username = Username::new(self.username)?;
        let email_address = EmailAddress::new(self.email_address)?;
        let password = self.password;
        Ok(RegisterCommand::new(username, email_address, password))
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

/// The verification token value rides along in the response; delivering it
/// over email is external infrastructure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub verification_token: String,
}

impl From<(&UserAccount, &VerificationToken)> for RegisterResponseData {
    fn from((account, token): (&UserAccount, &VerificationToken)) -> Self {
        Self {
            id: account.id.0,
            username: account.username.as_str().to_string(),
            email: account.email.as_str().to_string(),
            enabled: account.enabled,
            created_at: account.created_at,
            verification_token: token.value.clone(),
        }
    }
}
