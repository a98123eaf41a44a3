use auth::Principal;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::authority::errors::AuthorityError;
use crate::authority::models::AuthorityId;
use crate::domain::authority::ports::AuthorityServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::MessageData;
use crate::inbound::http::router::AppState;

pub async fn delete_sub_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let authority_id = AuthorityId::from_string(&id).map_err(AuthorityError::from)?;

    state
        .authority_service
        .delete_sub_user(&principal, &authority_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageData::new("User deleted")))
}
