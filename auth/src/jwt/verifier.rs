use std::sync::Arc;

use super::claims::TokenClaims;
use super::claims::TokenKind;
use super::codec::decode_claims;
use super::errors::JwtError;
use super::keys::VerifyingKey;
use crate::principal::Principal;

/// Validates tokens with the public key only.
#[derive(Clone)]
pub struct TokenVerifier {
    key: Arc<VerifyingKey>,
    issuer: String,
}

impl TokenVerifier {
    pub fn new(key: Arc<VerifyingKey>, issuer: impl Into<String>) -> Self {
        Self {
            key,
            issuer: issuer.into(),
        }
    }

    /// Decode a token and require its kind marker to be `expected`.
    ///
    /// # Errors
    /// * `InvalidSignature` - Signature does not verify
    /// * `Expired` - Token has expired
    /// * `MalformedClaims` - Structure, issuer or claims are invalid
    /// * `WrongTokenKind` - A refresh token presented as access or the reverse
    pub fn decode(&self, token: &str, expected: TokenKind) -> Result<TokenClaims, JwtError> {
        let claims = decode_claims(token, self.key.decoding_key(), &self.issuer)?;

        if claims.kind != expected {
            return Err(JwtError::WrongTokenKind {
                expected,
                found: claims.kind,
            });
        }

        Ok(claims)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Principal, JwtError> {
        self.decode(token, TokenKind::Access)
            .map(|claims| claims.principal())
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<Principal, JwtError> {
        self.decode(token, TokenKind::Refresh)
            .map(|claims| claims.principal())
    }
}
