use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::login::TokenData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::session::ports::SessionServicePort;
use crate::inbound::http::router::AppState;

pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<ApiSuccess<TokenData>, ApiError> {
    let token = body.refresh_token.trim();
    if token.is_empty() {
        return Err(ApiError::BadRequest("refresh_token is required".to_string()));
    }

    state
        .session_service
        .refresh(token)
        .await
        .map_err(ApiError::from)
        .map(|ref pair| ApiSuccess::new(StatusCode::OK, pair.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(default)]
    refresh_token: String,
}
