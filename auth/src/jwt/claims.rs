use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::errors::JwtError;
use crate::principal::Principal;
use crate::principal::Role;

/// Structural marker separating access tokens from refresh tokens.
///
/// Both kinds share one claim schema, so the verifier rejects any token whose
/// marker differs from the kind it was asked to verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// Claims carried by both access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenClaims {
    /// Identity (authority) identifier
    pub sub: Uuid,

    /// Tenant (hospital) identifier
    pub tenant_id: i64,

    pub role: Role,

    pub kind: TokenKind,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    pub iss: String,

    /// Unique token identifier, used by the refresh-token registry
    pub jti: Uuid,
}

impl TokenClaims {
    /// Build claims for `principal` valid from `issued_at` for `lifetime`.
    ///
    /// # Errors
    /// * `InvalidLifetime` - The expiry falls outside the representable time range
    pub fn new(
        principal: &Principal,
        kind: TokenKind,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
        issuer: &str,
    ) -> Result<Self, JwtError> {
        let expires_at =
            issued_at
                .checked_add_signed(lifetime)
                .ok_or_else(|| JwtError::InvalidLifetime {
                    value: lifetime.to_string(),
                    reason: "expiry overflows the timestamp range".to_string(),
                })?;

        Ok(Self {
            sub: principal.identity_id,
            tenant_id: principal.tenant_id,
            role: principal.role,
            kind,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: issuer.to_string(),
            jti: Uuid::new_v4(),
        })
    }

    pub fn principal(&self) -> Principal {
        Principal::new(self.sub, self.tenant_id, self.role)
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal() -> Principal {
        Principal::new(Uuid::new_v4(), 42, Role::Admin)
    }

    #[test]
    fn test_new_claims_horizon() {
        let now = Utc::now();
        let claims = TokenClaims::new(
            &principal(),
            TokenKind::Access,
            now,
            Duration::minutes(15),
            "hospital-api",
        )
        .unwrap();

        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.iss, "hospital-api");
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn test_principal_round_trip() {
        let principal = principal();
        let claims = TokenClaims::new(
            &principal,
            TokenKind::Refresh,
            Utc::now(),
            Duration::hours(168),
            "hospital-api",
        )
        .unwrap();

        assert_eq!(claims.principal(), principal);
    }

    #[test]
    fn test_jti_is_unique_per_claim_set() {
        let principal = principal();
        let now = Utc::now();
        let a = TokenClaims::new(&principal, TokenKind::Access, now, Duration::minutes(1), "x").unwrap();
        let b = TokenClaims::new(&principal, TokenKind::Access, now, Duration::minutes(1), "x").unwrap();

        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let claims = TokenClaims::new(
            &principal(),
            TokenKind::Refresh,
            Utc::now(),
            Duration::days(7),
            "hospital-api",
        )
        .unwrap();
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["kind"], "refresh");
        assert_eq!(json["role"], "admin");
        assert_eq!(json["tenant_id"], 42);
    }

    #[test]
    fn test_overflowing_lifetime_is_rejected() {
        let result = TokenClaims::new(
            &principal(),
            TokenKind::Refresh,
            Utc::now(),
            Duration::days(73_000_000_000),
            "hospital-api",
        );

        assert!(matches!(result, Err(JwtError::InvalidLifetime { .. })));
    }

    #[test]
    fn test_is_expired() {
        let mut claims = TokenClaims::new(
            &principal(),
            TokenKind::Access,
            Utc::now(),
            Duration::minutes(1),
            "x",
        )
        .unwrap();
        claims.exp = 1000;

        assert!(!claims.is_expired(999));
        assert!(!claims.is_expired(1000));
        assert!(claims.is_expired(1001));
    }
}
