use thiserror::Error;

use crate::domain::authority::errors::AuthorityError;
use crate::domain::registration::models::IdempotencyKey;
use crate::domain::authority::models::HospitalId;

/// Error for hospital profile validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HospitalProfileError {
    #[error("Hospital name is required")]
    EmptyName,

    #[error("Tax number must be 10 or 11 digits, got '{0}'")]
    InvalidTaxNumber(String),

    #[error("Address is required")]
    EmptyAddress,

    #[error("{field} must be greater than 0")]
    InvalidLocation { field: &'static str },
}

/// Failure talking to the remote hospital service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HospitalClientError {
    #[error("Hospital service unreachable: {0}")]
    Unreachable(String),

    #[error("Hospital service returned status {status}")]
    Rejected { status: u16 },

    #[error("Hospital service response could not be decoded: {0}")]
    InvalidResponse(String),
}

/// Error for provisioning ledger operations
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Corrupt provisioning record {key}: {reason}")]
    CorruptRecord { key: String, reason: String },
}

/// Top-level error for hospital registration and reconciliation
#[derive(Debug, Clone, Error)]
pub enum RegistrationError {
    #[error("Invalid hospital: {0}")]
    InvalidHospital(#[from] HospitalProfileError),

    #[error("A user with this TC, email or phone already exists")]
    AlreadyExists,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Hospital could not be created: {0}")]
    Upstream(#[from] HospitalClientError),

    #[error("Hospital {hospital_id} was created but its administrator could not be stored (request {idempotency_key}): {reason}")]
    OrphanedTenant {
        hospital_id: HospitalId,
        idempotency_key: IdempotencyKey,
        conflict: bool,
        reason: String,
    },

    #[error("Provisioning request not found: {0}")]
    RequestNotFound(String),

    #[error("Provisioning ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Authority(#[from] AuthorityError),
}
