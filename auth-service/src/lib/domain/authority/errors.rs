use thiserror::Error;

/// Error for AuthorityId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthorityIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for PersonName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersonNameError {
    #[error("Name is required")]
    Empty,

    #[error("Name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for NationalId (TC) validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NationalIdError {
    #[error("TC identity number must be exactly 11 digits, got {actual} characters")]
    InvalidLength { actual: usize },

    #[error("TC identity number must contain only digits")]
    NonDigit,

    #[error("TC identity number cannot start with 0")]
    LeadingZero,
}

/// Error for PhoneNumber validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PhoneNumberError {
    #[error("Invalid phone number '{0}': expected 5xx xxx xx xx, optionally prefixed with 0 or +90")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for password strength validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Password must contain uppercase, lowercase and digit")]
    MissingCharacterClass,
}

/// Top-level error for identity (authority) operations
#[derive(Debug, Clone, Error)]
pub enum AuthorityError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid authority ID: {0}")]
    InvalidAuthorityId(#[from] AuthorityIdError),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] PersonNameError),

    #[error("Invalid TC: {0}")]
    InvalidNationalId(#[from] NationalIdError),

    #[error("Invalid phone: {0}")]
    InvalidPhone(#[from] PhoneNumberError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordPolicyError),

    #[error("Invalid role: {0}")]
    InvalidRole(#[from] auth::RoleError),

    // Domain-level errors
    #[error("Authority not found: {0}")]
    NotFound(String),

    #[error("A user with this TC, email or phone already exists")]
    AlreadyExists,

    #[error("Authority {0} belongs to another hospital")]
    Forbidden(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),
}
