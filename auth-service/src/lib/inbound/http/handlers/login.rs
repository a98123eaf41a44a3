use auth::TokenPair;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::session::ports::SessionServicePort;
use crate::inbound::http::router::AppState;
use crate::session::models::LoginCommand;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<TokenData>, ApiError> {
    if body.credential.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest(
            "credential and password are required".to_string(),
        ));
    }

    state
        .session_service
        .login(LoginCommand {
            credential: body.credential,
            password: body.password,
        })
        .await
        .map_err(ApiError::from)
        .map(|ref pair| ApiSuccess::new(StatusCode::OK, pair.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    credential: String,
    password: String,
}

/// Token pair as returned by login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenData {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

impl From<&TokenPair> for TokenData {
    fn from(pair: &TokenPair) -> Self {
        Self {
            access_token: pair.access_token.clone(),
            refresh_token: pair.refresh_token.clone(),
            expires_in: pair.expires_in,
        }
    }
}
