use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;

use crate::jwt::JwtError;
use crate::jwt::SigningKeys;
use crate::jwt::TokenClaims;
use crate::jwt::TokenIssuer;
use crate::jwt::TokenKind;
use crate::jwt::TokenPair;
use crate::jwt::TokenPolicy;
use crate::jwt::TokenVerifier;
use crate::password::CredentialHasher;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::principal::Principal;

/// Authentication coordinator combining credential hashing and the token
/// lifecycle (issue, verify, refresh).
pub struct Authenticator {
    hasher: Arc<dyn CredentialHasher>,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid refresh token: {0}")]
    InvalidRefreshToken(JwtError),

    #[error("Token error: {0}")]
    Token(#[from] JwtError),
}

impl Authenticator {
    /// Create an authenticator with the default Argon2id hasher.
    ///
    /// # Arguments
    /// * `keys` - Loaded signing key pair
    /// * `policy` - Issuer and token lifetimes
    pub fn new(keys: Arc<SigningKeys>, policy: TokenPolicy) -> Self {
        let verifier = TokenVerifier::new(keys.verifying_key(), policy.issuer.clone());

        Self {
            hasher: Arc::new(PasswordHasher::new()),
            issuer: TokenIssuer::new(keys, policy),
            verifier,
        }
    }

    /// Replace the credential hasher.
    pub fn with_hasher(mut self, hasher: Arc<dyn CredentialHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    /// Verifier sharing this authenticator's public key and issuer.
    pub fn verifier(&self) -> TokenVerifier {
        self.verifier.clone()
    }

    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.hasher.hash(password)
    }

    pub fn verify_password(&self, password: &str, digest: &str) -> bool {
        self.hasher.verify(password, digest)
    }

    /// Verify credentials and issue a token pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match the stored digest
    /// * `Token` - Token issuance failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_digest: &str,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, AuthenticationError> {
        if !self.hasher.verify(password, stored_digest) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issuer.issue_token_pair(principal, now)?)
    }

    pub fn issue_token_pair(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, JwtError> {
        self.issuer.issue_token_pair(principal, now)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Principal, JwtError> {
        self.verifier.verify_access_token(token)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<Principal, JwtError> {
        self.verifier.verify_refresh_token(token)
    }

    /// Full refresh-token claims, including the `jti` the registry tracks.
    pub fn decode_refresh_token(&self, token: &str) -> Result<TokenClaims, JwtError> {
        self.verifier.decode(token, TokenKind::Refresh)
    }

    /// Exchange a refresh token for a brand new pair.
    ///
    /// Both tokens are rotated. Nothing is tracked server-side here, so a
    /// refresh token stays usable until it expires.
    ///
    /// # Errors
    /// * `InvalidRefreshToken` - Verification of the presented token failed
    /// * `Token` - Issuing the new pair failed
    pub fn refresh_access_token(
        &self,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, AuthenticationError> {
        let principal = self
            .verifier
            .verify_refresh_token(refresh_token)
            .map_err(AuthenticationError::InvalidRefreshToken)?;

        Ok(self.issuer.issue_token_pair(&principal, now)?)
    }
}
