use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Unknown or already-consumed tokens answer 200 with `verified: false`;
/// only infrastructure failures surface as HTTP errors.
pub async fn verify_account(
    State(state): State<AppState>,
    Json(body): Json<VerifyAccountRequestBody>,
) -> Result<ApiSuccess<VerifyAccountResponseData>, ApiError> {
    state
        .auth_service
        .verify_account(&body.token)
        .await
        .map_err(ApiError::from)
        .map(|verified| ApiSuccess::new(StatusCode::OK, VerifyAccountResponseData { verified }))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyAccountRequestBody {
    token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyAccountResponseData {
    pub verified: bool,
}
