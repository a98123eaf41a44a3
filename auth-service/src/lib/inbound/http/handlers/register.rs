use axum::extract::State;
use axum::http::StatusCode;
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
use crate::authority::models::EmailAddress;
use crate::authority::models::NationalId;
use crate::authority::models::PersonName;
use crate::authority::models::PersonProfile;
use crate::authority::models::PhoneNumber;
use crate::domain::registration::ports::RegistrationServicePort;
use crate::inbound::http::router::AppState;
use crate::registration::errors::HospitalProfileError;
use crate::registration::models::HospitalProfile;
use crate::registration::models::RegisterCommand;
use crate::registration::models::TaxNumber;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<AuthorityData>, ApiError> {
    let command = body.try_into_command()?;
    tracing::info!(
        hospital_name = %command.hospital.name,
        authority_email = %command.administrator.email.as_str(),
        "Registration attempt"
    );

    state
        .registration_service
        .register(command)
        .await
        .map_err(ApiError::from)
        .map(|ref authority| ApiSuccess::new(StatusCode::CREATED, authority.into()))
}

/// HTTP request body for registering a hospital with its first administrator
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    hospital_name: String,
    tax_number: String,
    hospital_email: String,
    hospital_phone: String,
    address: String,
    city_id: i64,
    district_id: i64,
    authority_fname: String,
    authority_lname: String,
    authority_tc: String,
    authority_email: String,
    authority_phone: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid hospital: {0}")]
    Hospital(#[from] HospitalProfileError),

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
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ParseRegisterRequestError> {
        let hospital = HospitalProfile::new(
            self.hospital_name,
            TaxNumber::new(self.tax_number)?,
            EmailAddress::new(self.hospital_email)?,
            PhoneNumber::new(self.hospital_phone)?,
            self.address,
            self.city_id,
            self.district_id,
        )?;
        let administrator = PersonProfile {
            first_name: PersonName::new(self.authority_fname)?,
            last_name: PersonName::new(self.authority_lname)?,
            national_id: NationalId::new(self.authority_tc)?,
            email: EmailAddress::new(self.authority_email)?,
            phone: PhoneNumber::new(self.authority_phone)?,
        };
        check_password_strength(&self.password)?;

        Ok(RegisterCommand {
            hospital,
            administrator,
            password: self.password,
        })
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
