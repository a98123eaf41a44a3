use thiserror::Error;

use crate::jwt::JwtError;
use crate::jwt::TokenVerifier;
use crate::principal::Principal;
use crate::principal::Role;

const BEARER_PREFIX: &str = "Bearer ";

/// Rejections produced by the authorization gate.
#[derive(Debug, Clone, Error)]
pub enum GateError {
    #[error("Missing Authorization header")]
    MissingCredentials,

    #[error("Invalid Authorization header format. Expected: Bearer <token>")]
    InvalidScheme,

    #[error("Invalid or expired access token")]
    InvalidToken(#[source] JwtError),

    #[error("Unauthorized")]
    Unauthenticated,

    #[error("Forbidden: insufficient role")]
    Forbidden { role: Role },
}

impl GateError {
    /// `true` for 403-class rejections, `false` for 401-class ones.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, GateError::Forbidden { .. })
    }
}

/// Framework-agnostic request gate.
///
/// Every service that trusts the auth service's tokens builds one of these
/// from the public key and plugs it into its own request pipeline.
#[derive(Clone)]
pub struct AuthorizationGate {
    verifier: TokenVerifier,
}

impl AuthorizationGate {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    /// Resolve the principal from a raw `Authorization` header value.
    ///
    /// Fails closed: no header, a non-Bearer scheme or any verification
    /// failure is rejected.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Principal, GateError> {
        let header = authorization.ok_or(GateError::MissingCredentials)?;
        let token = header
            .strip_prefix(BEARER_PREFIX)
            .ok_or(GateError::InvalidScheme)?;

        self.verifier
            .verify_access_token(token.trim())
            .map_err(GateError::InvalidToken)
    }
}

/// Second gate stage: the attached principal must hold one of `allowed`.
pub fn require_role<'a>(
    principal: Option<&'a Principal>,
    allowed: &[Role],
) -> Result<&'a Principal, GateError> {
    let principal = principal.ok_or(GateError::Unauthenticated)?;

    if principal.has_any_role(allowed) {
        Ok(principal)
    } else {
        Err(GateError::Forbidden {
            role: principal.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::jwt::keys::test_keys::*;
    use crate::jwt::SigningKeys;
    use crate::jwt::TokenIssuer;
    use crate::jwt::TokenPolicy;

    fn setup() -> (TokenIssuer, AuthorizationGate) {
        let keys = Arc::new(SigningKeys::from_pem(PRIVATE_PEM, PUBLIC_PEM).unwrap());
        let gate = AuthorizationGate::new(TokenVerifier::new(keys.verifying_key(), "hospital-api"));
        (TokenIssuer::new(keys, TokenPolicy::default()), gate)
    }

    #[test]
    fn test_missing_header() {
        let (_, gate) = setup();
        assert!(matches!(gate.authenticate(None), Err(GateError::MissingCredentials)));
    }

    #[test]
    fn test_wrong_scheme() {
        let (issuer, gate) = setup();
        let principal = Principal::new(Uuid::new_v4(), 1, Role::Admin);
        let pair = issuer.issue_token_pair(&principal, Utc::now()).unwrap();

        for header in [
            format!("Basic {}", pair.access_token),
            format!("bearer {}", pair.access_token),
            pair.access_token.clone(),
        ] {
            assert!(matches!(
                gate.authenticate(Some(&header)),
                Err(GateError::InvalidScheme)
            ));
        }
    }

    #[test]
    fn test_valid_bearer_token() {
        let (issuer, gate) = setup();
        let principal = Principal::new(Uuid::new_v4(), 1, Role::Staff);
        let pair = issuer.issue_token_pair(&principal, Utc::now()).unwrap();

        let header = format!("Bearer {}", pair.access_token);
        assert_eq!(gate.authenticate(Some(&header)).unwrap(), principal);
    }

    #[test]
    fn test_refresh_token_does_not_pass_gate() {
        let (issuer, gate) = setup();
        let principal = Principal::new(Uuid::new_v4(), 1, Role::Admin);
        let pair = issuer.issue_token_pair(&principal, Utc::now()).unwrap();

        let header = format!("Bearer {}", pair.refresh_token);
        assert!(matches!(
            gate.authenticate(Some(&header)),
            Err(GateError::InvalidToken(JwtError::WrongTokenKind { .. }))
        ));
    }

    #[test]
    fn test_require_role() {
        let admin = Principal::new(Uuid::new_v4(), 1, Role::Admin);
        let staff = Principal::new(Uuid::new_v4(), 1, Role::Staff);

        assert!(require_role(Some(&admin), &[Role::Admin]).is_ok());
        assert!(require_role(Some(&staff), &[Role::Admin, Role::Staff]).is_ok());

        let denied = require_role(Some(&admin), &[Role::Staff]).unwrap_err();
        assert!(denied.is_forbidden());

        let denied = require_role(None, &[Role::Admin]).unwrap_err();
        assert!(matches!(denied, GateError::Unauthenticated));
        assert!(!denied.is_forbidden());
    }
}
