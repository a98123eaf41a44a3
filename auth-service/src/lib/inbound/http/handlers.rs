use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::authority::errors::AuthorityError;
use crate::authority::models::Authority;
use crate::recovery::errors::RecoveryError;
use crate::registration::errors::RegistrationError;
use crate::session::errors::SessionError;

pub mod create_sub_user;
pub mod delete_sub_user;
pub mod forgot_password;
pub mod list_sub_users;
pub mod login;
pub mod me;
pub mod refresh_token;
pub mod register;
pub mod reset_password;
pub mod update_sub_user;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
const HOSPITAL_NOT_CREATED_MESSAGE: &str = "Hospital could not be created";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<AuthorityError> for ApiError {
    fn from(err: AuthorityError) -> Self {
        match err {
            AuthorityError::NotFound(_) => ApiError::NotFound(err.to_string()),
            AuthorityError::AlreadyExists => ApiError::Conflict(err.to_string()),
            AuthorityError::Forbidden(_) => ApiError::Forbidden(err.to_string()),
            AuthorityError::InvalidAuthorityId(_)
            | AuthorityError::InvalidName(_)
            | AuthorityError::InvalidNationalId(_)
            | AuthorityError::InvalidPhone(_)
            | AuthorityError::InvalidEmail(_)
            | AuthorityError::InvalidPassword(_)
            | AuthorityError::InvalidRole(_) => ApiError::UnprocessableEntity(err.to_string()),
            AuthorityError::PasswordHash(_)
            | AuthorityError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::InvalidHospital(_) => ApiError::UnprocessableEntity(err.to_string()),
            RegistrationError::AlreadyExists => ApiError::Conflict(err.to_string()),
            RegistrationError::Upstream(ref cause) => {
                tracing::error!(error = %cause, "Hospital provisioning failed upstream");
                ApiError::Conflict(HOSPITAL_NOT_CREATED_MESSAGE.to_string())
            }
            RegistrationError::OrphanedTenant { conflict: true, .. } => {
                ApiError::Conflict(RegistrationError::AlreadyExists.to_string())
            }
            RegistrationError::RequestNotFound(_) => ApiError::NotFound(err.to_string()),
            RegistrationError::Authority(inner) => inner.into(),
            RegistrationError::OrphanedTenant { .. }
            | RegistrationError::PasswordHash(_)
            | RegistrationError::Ledger(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            SessionError::InvalidRefreshToken(ref cause) => {
                tracing::warn!(error = %cause, "Refresh token rejected");
                ApiError::Unauthorized("Invalid or expired refresh token".to_string())
            }
            SessionError::RefreshTokenRevoked => {
                tracing::warn!("Revoked or unknown refresh token presented");
                ApiError::Unauthorized("Invalid or expired refresh token".to_string())
            }
            SessionError::Authority(inner) => inner.into(),
            SessionError::Token(_) | SessionError::Registry(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<RecoveryError> for ApiError {
    fn from(err: RecoveryError) -> Self {
        match err {
            RecoveryError::NotFound(_)
            | RecoveryError::PasswordMismatch
            | RecoveryError::WeakPassword(_)
            | RecoveryError::InvalidOrExpiredCode => ApiError::BadRequest(err.to_string()),
            RecoveryError::Authority(AuthorityError::NotFound(_)) => {
                ApiError::BadRequest(err.to_string())
            }
            RecoveryError::Authority(inner) => inner.into(),
            RecoveryError::PasswordHash(_) | RecoveryError::Store(_) | RecoveryError::Delivery(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<auth::GateError> for ApiError {
    fn from(err: auth::GateError) -> Self {
        if err.is_forbidden() {
            ApiError::Forbidden(err.to_string())
        } else {
            ApiError::Unauthorized(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub message: String,
}

impl MessageData {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Identity as exposed over HTTP; never carries the password digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorityData {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub tc: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub hospital_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Authority> for AuthorityData {
    fn from(authority: &Authority) -> Self {
        Self {
            id: authority.id.to_string(),
            first_name: authority.first_name.as_str().to_string(),
            last_name: authority.last_name.as_str().to_string(),
            tc: authority.national_id.as_str().to_string(),
            email: authority.email.as_str().to_string(),
            phone: authority.phone.as_str().to_string(),
            role: authority.role.as_str().to_string(),
            hospital_id: authority.hospital_id.0,
            created_at: authority.created_at,
            updated_at: authority.updated_at,
        }
    }
}
