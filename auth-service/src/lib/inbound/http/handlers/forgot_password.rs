use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::authority::models::PhoneNumber;
use crate::domain::recovery::ports::RecoveryServicePort;
use crate::inbound::http::router::AppState;

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let phone = PhoneNumber::new(body.phone).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .recovery_service
        .forgot_password(&phone)
        .await
        .map_err(ApiError::from)
        .map(|_| {
            ApiSuccess::new(
                StatusCode::OK,
                MessageData::new("Reset code sent to your phone"),
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForgotPasswordRequest {
    phone: String,
}
