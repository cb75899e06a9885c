use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::models::Username;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Same request and response shape as the stateless login; the token here
/// is an opaque server-side session value rather than a signed token.
pub async fn login_session(
    State(state): State<AppState>,
    Json(body): Json<LoginSessionRequestBody>,
) -> Result<ApiSuccess<LoginSessionResponseData>, ApiError> {
    let username = Username::new(body.username)
        .map_err(|_| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let token = state
        .auth_service
        .login_session(&username, &body.password)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginSessionResponseData { token },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginSessionRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginSessionResponseData {
    pub token: String,
}
