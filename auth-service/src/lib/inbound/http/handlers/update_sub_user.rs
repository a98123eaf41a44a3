use auth::Principal;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;

use super::create_sub_user::SubUserRequest;
use super::ApiError;
use super::ApiSuccess;
use super::AuthorityData;
use crate::authority::errors::AuthorityError;
use crate::authority::models::AuthorityId;
use crate::authority::models::UpdateSubUserCommand;
use crate::domain::authority::ports::AuthorityServicePort;
use crate::inbound::http::router::AppState;

pub async fn update_sub_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(body): Json<SubUserRequest>,
) -> Result<ApiSuccess<AuthorityData>, ApiError> {
    let authority_id = AuthorityId::from_string(&id).map_err(AuthorityError::from)?;
    let (profile, password, role) = body.parse()?;

    state
        .authority_service
        .update_sub_user(
            &principal,
            &authority_id,
            UpdateSubUserCommand {
                profile,
                password,
                role,
            },
        )
        .await
        .map_err(ApiError::from)
        .map(|ref authority| ApiSuccess::new(StatusCode::OK, authority.into()))
}
