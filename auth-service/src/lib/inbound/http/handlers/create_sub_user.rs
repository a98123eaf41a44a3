use auth::Principal;
use auth::Role;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::AuthorityData;
use crate::authority::errors::EmailError;
use crate::authority::errors::NationalIdError;
use crate::authority::errors::PasswordPolicyError;
use crate::authority::errors::PersonNameError;
use crate::authority::errors::PhoneNumberError;
use crate::authority::models::check_password_strength;
use crate::authority::models::CreateSubUserCommand;
use crate::authority::models::EmailAddress;
use crate::authority::models::NationalId;
use crate::authority::models::PersonName;
use crate::authority::models::PersonProfile;
use crate::authority::models::PhoneNumber;
use crate::domain::authority::ports::AuthorityServicePort;
use crate::inbound::http::router::AppState;

pub async fn create_sub_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<SubUserRequest>,
) -> Result<ApiSuccess<AuthorityData>, ApiError> {
    let (profile, password, role) = body.parse()?;
    let password = password.ok_or_else(|| {
        ApiError::UnprocessableEntity("Invalid password: password is required".to_string())
    })?;

    state
        .authority_service
        .create_sub_user(
            &principal,
            CreateSubUserCommand {
                profile,
                password,
                role,
            },
        )
        .await
        .map_err(ApiError::from)
        .map(|ref authority| ApiSuccess::new(StatusCode::CREATED, authority.into()))
}

/// HTTP request body shared by sub-user creation and update
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubUserRequest {
    first_name: String,
    last_name: String,
    tc: String,
    email: String,
    phone: String,
    #[serde(default)]
    password: Option<String>,
    role: String,
}

#[derive(Debug, Clone, Error)]
pub(super) enum ParseSubUserRequestError {
    #[error("Invalid name: {0}")]
    Name(#[from] PersonNameError),

    #[error("Invalid TC: {0}")]
    NationalId(#[from] NationalIdError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid phone: {0}")]
    Phone(#[from] PhoneNumberError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordPolicyError),

    #[error("Invalid role: {0}")]
    Role(#[from] auth::RoleError),
}

impl SubUserRequest {
    /// Validated profile, the password when one was supplied (empty counts
    /// as absent), and the role.
    pub(super) fn parse(
        self,
    ) -> Result<(PersonProfile, Option<String>, Role), ParseSubUserRequestError> {
        let profile = PersonProfile {
            first_name: PersonName::new(self.first_name)?,
            last_name: PersonName::new(self.last_name)?,
            national_id: NationalId::new(self.tc)?,
            email: EmailAddress::new(self.email)?,
            phone: PhoneNumber::new(self.phone)?,
        };
        let role: Role = self.role.parse()?;
        let password = self.password.filter(|password| !password.is_empty());
        if let Some(ref password) = password {
            check_password_strength(password)?;
        }

        Ok((profile, password, role))
    }
}

impl From<ParseSubUserRequestError> for ApiError {
    fn from(err: ParseSubUserRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
