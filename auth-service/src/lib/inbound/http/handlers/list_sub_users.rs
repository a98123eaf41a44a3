use auth::Principal;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::AuthorityData;
use crate::domain::authority::ports::AuthorityServicePort;
use crate::inbound::http::router::AppState;

pub async fn list_sub_users(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<ApiSuccess<Vec<AuthorityData>>, ApiError> {
    state
        .authority_service
        .list_sub_users(&principal)
        .await
        .map_err(ApiError::from)
        .map(|authorities| {
            ApiSuccess::new(
                StatusCode::OK,
                authorities.iter().map(AuthorityData::from).collect(),
            )
        })
}
