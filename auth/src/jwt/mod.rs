pub mod claims;
pub mod codec;
pub mod errors;
pub mod issuer;
pub mod keys;
pub mod lifetime;
pub mod verifier;

pub use claims::TokenClaims;
pub use claims::TokenKind;
pub use errors::JwtError;
pub use issuer::TokenIssuer;
pub use issuer::TokenPair;
pub use issuer::TokenPolicy;
pub use keys::SigningKeys;
pub use keys::VerifyingKey;
pub use verifier::TokenVerifier;
