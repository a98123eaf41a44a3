use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use super::claims::TokenClaims;
use super::claims::TokenKind;
use super::codec::encode_claims;
use super::errors::JwtError;
use super::keys::SigningKeys;
use super::lifetime::parse_lifetime;
use crate::principal::Principal;

/// Expiry and issuer policy applied to every issued pair.
///
/// Lifetimes stay as configured strings and are parsed on each issuance, so a
/// bad value surfaces as `InvalidLifetime` rather than a panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPolicy {
    pub issuer: String,
    pub access_lifetime: String,
    pub refresh_lifetime: String,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            issuer: "hospital-api".to_string(),
            access_lifetime: "15m".to_string(),
            refresh_lifetime: "168h".to_string(),
        }
    }
}

/// Access and refresh tokens minted together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,

    /// `jti` of the refresh token
    pub refresh_token_id: Uuid,

    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,
}

/// Signs token pairs with the private key.
pub struct TokenIssuer {
    keys: Arc<SigningKeys>,
    policy: TokenPolicy,
}

impl TokenIssuer {
    pub fn new(keys: Arc<SigningKeys>, policy: TokenPolicy) -> Self {
        Self { keys, policy }
    }

    pub fn policy(&self) -> &TokenPolicy {
        &self.policy
    }

    /// Issue an access/refresh pair for `principal` as of `now`.
    ///
    /// The two claim sets differ only in kind, expiry and `jti`; each is
    /// signed independently.
    ///
    /// # Errors
    /// * `InvalidLifetime` - A configured lifetime cannot be parsed or overflows the expiry
    /// * `Signing` - Signing either token failed
    pub fn issue_token_pair(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, JwtError> {
        let access_lifetime = parse_lifetime(&self.policy.access_lifetime)?;
        let refresh_lifetime = parse_lifetime(&self.policy.refresh_lifetime)?;

        let access_claims = TokenClaims::new(
            principal,
            TokenKind::Access,
            now,
            access_lifetime,
            &self.policy.issuer,
        )?;
        let refresh_claims = TokenClaims::new(
            principal,
            TokenKind::Refresh,
            now,
            refresh_lifetime,
            &self.policy.issuer,
        )?;

        let access_token = encode_claims(&access_claims, self.keys.encoding_key())?;
        let refresh_token = encode_claims(&refresh_claims, self.keys.encoding_key())?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: access_lifetime.num_seconds(),
            refresh_token_id: refresh_claims.jti,
            refresh_expires_in: refresh_lifetime.num_seconds(),
        })
    }
}
