use auth::require_role;
use auth::Principal;
use auth::Role;
use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Verifies the Bearer access token and attaches its `Principal` to the
/// request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default());

    let principal = state.gate.authenticate(header).map_err(|e| {
        tracing::warn!(error = %e, uri = %req.uri(), "Access token rejected");
        ApiError::from(e).into_response()
    })?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Admits only principals holding the `admin` role.
///
/// Must run after `authenticate`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, Response> {
    if let Err(e) = require_role(req.extensions().get::<Principal>(), &[Role::Admin]) {
        tracing::warn!(error = %e, uri = %req.uri(), "Role check failed");
        return Err(ApiError::from(e).into_response());
    }

    Ok(next.run(req).await)
}
