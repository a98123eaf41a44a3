use std::fmt;
use std::str::FromStr;

use auth::Principal;
use auth::Role;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::authority::errors::AuthorityIdError;
use crate::domain::authority::errors::EmailError;
use crate::domain::authority::errors::NationalIdError;
use crate::domain::authority::errors::PasswordPolicyError;
use crate::domain::authority::errors::PersonNameError;
use crate::domain::authority::errors::PhoneNumberError;

/// Identity aggregate: a person allowed to act on behalf of a hospital.
#[derive(Debug, Clone)]
pub struct Authority {
    pub id: AuthorityId,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub national_id: NationalId,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
    pub password_hash: String,
    pub role: Role,
    pub hospital_id: HospitalId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Authority {
    /// Build a new identity with a fresh id and current timestamps.
    pub fn new(profile: PersonProfile, password_hash: String, role: Role, hospital_id: HospitalId) -> Self {
        let now = Utc::now();
        Self {
            id: AuthorityId::new(),
            first_name: profile.first_name,
            last_name: profile.last_name,
            national_id: profile.national_id,
            email: profile.email,
            phone: profile.phone,
            password_hash,
            role,
            hospital_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Principal carried by tokens issued for this identity.
    pub fn principal(&self) -> Principal {
        Principal::new(self.id.0, self.hospital_id.0, self.role)
    }

    pub fn belongs_to(&self, hospital_id: HospitalId) -> bool {
        self.hospital_id == hospital_id
    }
}

/// Personal data shared by registration, sub-user creation and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonProfile {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub national_id: NationalId,
    pub email: EmailAddress,
    pub phone: PhoneNumber,
}

/// Authority unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuthorityId(pub Uuid);

impl AuthorityId {
    /// Generate a new random authority ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an authority ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AuthorityIdError> {
        Uuid::parse_str(s)
            .map(AuthorityId)
            .map_err(|e| AuthorityIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AuthorityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AuthorityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Tenant identifier assigned by the hospital service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HospitalId(pub i64);

impl fmt::Display for HospitalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// First or last name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    const MAX_LENGTH: usize = 100;

    /// # Errors
    /// * `Empty` - Blank after trimming
    /// * `TooLong` - More than 100 characters
    pub fn new(name: String) -> Result<Self, PersonNameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();

        if length == 0 {
            Err(PersonNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(PersonNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Turkish national identity number (TC kimlik no).
///
/// Eleven digits, first digit non-zero. The checksum digits are not verified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NationalId(String);

impl NationalId {
    const LENGTH: usize = 11;

    /// # Errors
    /// * `InvalidLength` - Not exactly 11 characters
    /// * `NonDigit` - Contains anything but ASCII digits
    /// * `LeadingZero` - Starts with 0
    pub fn new(tc: String) -> Result<Self, NationalIdError> {
        let tc = tc.trim().to_string();

        if tc.len() != Self::LENGTH {
            return Err(NationalIdError::InvalidLength { actual: tc.len() });
        }
        if !tc.chars().all(|c| c.is_ascii_digit()) {
            return Err(NationalIdError::NonDigit);
        }
        if tc.starts_with('0') {
            return Err(NationalIdError::LeadingZero);
        }

        Ok(Self(tc))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Mobile phone number in canonical ten-digit form (`5xxxxxxxxx`).
///
/// Spaces, dashes and parentheses are dropped, then a `+90` or `0` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    const LENGTH: usize = 10;

    /// Normalize and validate a phone number.
    ///
    /// # Errors
    /// * `InvalidFormat` - Normalized value is not 10 digits starting with 5
    pub fn new(phone: String) -> Result<Self, PhoneNumberError> {
        let compact: String = phone
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
            .collect();

        let national = compact.strip_prefix("+90").unwrap_or(&compact);
        let national = national.strip_prefix('0').unwrap_or(national);

        let valid = national.len() == Self::LENGTH
            && national.starts_with('5')
            && national.chars().all(|c| c.is_ascii_digit());

        if valid {
            Ok(Self(national.to_string()))
        } else {
            Err(PhoneNumberError::InvalidFormat(phone))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim().to_string();
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Password strength rule applied to every password a person chooses.
///
/// At least six characters with an uppercase letter, a lowercase letter and
/// a digit.
pub fn check_password_strength(password: &str) -> Result<(), PasswordPolicyError> {
    const MIN_LENGTH: usize = 6;

    let length = password.chars().count();
    if length < MIN_LENGTH {
        return Err(PasswordPolicyError::TooShort {
            min: MIN_LENGTH,
            actual: length,
        });
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_upper && has_lower && has_digit {
        Ok(())
    } else {
        Err(PasswordPolicyError::MissingCharacterClass)
    }
}

/// Command to create an identity inside the caller's hospital.
#[derive(Debug)]
pub struct CreateSubUserCommand {
    pub profile: PersonProfile,
    pub password: String,
    pub role: Role,
}

/// Command to replace a sub-user's profile.
///
/// The password is re-hashed only when present.
#[derive(Debug)]
pub struct UpdateSubUserCommand {
    pub profile: PersonProfile,
    pub password: Option<String>,
    pub role: Role,
}
