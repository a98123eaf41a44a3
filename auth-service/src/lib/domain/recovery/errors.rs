use thiserror::Error;

use crate::domain::authority::errors::AuthorityError;
use crate::domain::authority::errors::PasswordPolicyError;
use crate::domain::store::StoreError;

/// Error for recovery code delivery
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    #[error("Recovery code delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Top-level error for the credential recovery flow
#[derive(Debug, Clone, Error)]
pub enum RecoveryError {
    #[error("User not found with phone: {0}")]
    NotFound(String),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Invalid password: {0}")]
    WeakPassword(#[from] PasswordPolicyError),

    #[error("Invalid or expired code")]
    InvalidOrExpiredCode,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Recovery code store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Delivery(#[from] NotifierError),

    #[error(transparent)]
    Authority(#[from] AuthorityError),
}
