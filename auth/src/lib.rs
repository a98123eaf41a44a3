//! Authentication utilities library
//!
//! Shared by every hospital service that issues or trusts tokens:
//! - Credential hashing (Argon2id) behind the `CredentialHasher` capability
//! - RS256 access/refresh token issuing, verification and refresh
//! - A framework-agnostic authorization gate (Bearer + role checks)
//!
//! Services that only verify tokens need nothing but the public key.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::{CredentialHasher, PasswordHasher};
//!
//! let hasher = PasswordHasher::new();
//! let digest = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &digest));
//! assert!(!hasher.verify("other_password", &digest));
//! ```
//!
//! ## Token lifecycle
//! ```ignore
//! use std::sync::Arc;
//! use auth::{Authenticator, Principal, Role, SigningKeys, TokenPolicy};
//!
//! let keys = Arc::new(SigningKeys::from_pem(private_pem, public_pem)?);
//! let authenticator = Authenticator::new(keys, TokenPolicy::default());
//!
//! let principal = Principal::new(identity_id, hospital_id, Role::Admin);
//! let pair = authenticator.issue_token_pair(&principal, chrono::Utc::now())?;
//! assert_eq!(authenticator.verify_access_token(&pair.access_token)?, principal);
//!
//! let rotated = authenticator.refresh_access_token(&pair.refresh_token, chrono::Utc::now())?;
//! ```

pub mod authenticator;
pub mod gate;
pub mod jwt;
pub mod password;
pub mod principal;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use gate::require_role;
pub use gate::AuthorizationGate;
pub use gate::GateError;
pub use jwt::JwtError;
pub use jwt::SigningKeys;
pub use jwt::TokenClaims;
pub use jwt::TokenIssuer;
pub use jwt::TokenKind;
pub use jwt::TokenPair;
pub use jwt::TokenPolicy;
pub use jwt::TokenVerifier;
pub use jwt::VerifyingKey;
pub use password::CredentialHasher;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use principal::Principal;
pub use principal::Role;
pub use principal::RoleError;
