use thiserror::Error;

use super::claims::TokenKind;

/// Error type for token operations.
#[derive(Debug, Clone, Error)]
pub enum JwtError {
    #[error("Failed to load key material: {0}")]
    KeyLoad(String),

    #[error("Invalid token lifetime '{value}': {reason}")]
    InvalidLifetime { value: String, reason: String },

    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Token claims are malformed: {0}")]
    MalformedClaims(String),

    #[error("Expected {expected} token, got {found} token")]
    WrongTokenKind { expected: TokenKind, found: TokenKind },
}
