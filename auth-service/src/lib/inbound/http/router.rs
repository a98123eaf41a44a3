use std::sync::Arc;
use std::time::Duration;

use auth::AuthorizationGate;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_sub_user::create_sub_user;
use super::handlers::delete_sub_user::delete_sub_user;
use super::handlers::forgot_password::forgot_password;
use super::handlers::list_sub_users::list_sub_users;
use super::handlers::login::login;
use super::handlers::me::me;
use super::handlers::refresh_token::refresh_token;
use super::handlers::register::register;
use super::handlers::reset_password::reset_password;
use super::handlers::update_sub_user::update_sub_user;
use super::middleware::authenticate;
use super::middleware::require_admin;
use crate::domain::authority::ports::AuthorityServicePort;
use crate::domain::recovery::ports::RecoveryServicePort;
use crate::domain::registration::ports::RegistrationServicePort;
use crate::domain::session::ports::SessionServicePort;

#[derive(Clone)]
pub struct AppState {
    pub registration_service: Arc<dyn RegistrationServicePort>,
    pub session_service: Arc<dyn SessionServicePort>,
    pub recovery_service: Arc<dyn RecoveryServicePort>,
    pub authority_service: Arc<dyn AuthorityServicePort>,
    pub gate: Arc<AuthorizationGate>,
}

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/forgot-password", post(forgot_password))
        .route("/api/auth/reset-password", post(reset_password))
        .route("/api/auth/refresh-token", post(refresh_token));

    let authenticated_routes = Router::new()
        .route("/api/auth/me", get(me))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    // Layers wrap outward: authenticate runs before require_admin
    let admin_routes = Router::new()
        .route("/api/subuser", post(create_sub_user).get(list_sub_users))
        .route("/api/subuser/:id", put(update_sub_user).delete(delete_sub_user))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
