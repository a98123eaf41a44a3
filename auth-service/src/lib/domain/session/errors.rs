use auth::JwtError;
use thiserror::Error;

use crate::domain::authority::errors::AuthorityError;
use crate::domain::store::StoreError;

/// Top-level error for login and token refresh
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid refresh token: {0}")]
    InvalidRefreshToken(JwtError),

    #[error("Refresh token has been revoked")]
    RefreshTokenRevoked,

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Refresh token registry error: {0}")]
    Registry(#[from] StoreError),

    #[error(transparent)]
    Authority(#[from] AuthorityError),
}
