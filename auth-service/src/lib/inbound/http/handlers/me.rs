use auth::Principal;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::AuthorityData;
use crate::domain::authority::ports::AuthorityServicePort;
use crate::inbound::http::router::AppState;

pub async fn me(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<ApiSuccess<AuthorityData>, ApiError> {
    state
        .authority_service
        .get_profile(&principal)
        .await
        .map_err(ApiError::from)
        .map(|ref authority| ApiSuccess::new(StatusCode::OK, authority.into()))
}
