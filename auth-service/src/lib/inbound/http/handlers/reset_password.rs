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
use crate::recovery::models::ResetPasswordCommand;

pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let phone = PhoneNumber::new(body.phone).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let command = ResetPasswordCommand {
        phone,
        code: body.code.trim().to_string(),
        new_password: body.new_password,
        repeat_password: body.repeat_new_password,
    };

    state
        .recovery_service
        .reset_password(command)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageData::new("Password reset successful")))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResetPasswordRequest {
    phone: String,
    code: String,
    new_password: String,
    repeat_new_password: String,
}
