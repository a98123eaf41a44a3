use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::claims::TokenClaims;
use super::errors::JwtError;

pub(crate) const ALGORITHM: Algorithm = Algorithm::RS256;

/// Sign any serializable claim set with the private key.
///
/// # Errors
/// * `Signing` - The key was rejected by the signer or the claims could not be serialized
pub fn encode_claims<T: Serialize>(claims: &T, key: &EncodingKey) -> Result<String, JwtError> {
    encode(&Header::new(ALGORITHM), claims, key).map_err(|e| JwtError::Signing(e.to_string()))
}

/// Verify signature, issuer and expiry of `token` and return its claims.
///
/// Expiry is checked with zero leeway so an expired token is rejected
/// deterministically. The kind marker is not checked here.
///
/// # Errors
/// * `InvalidSignature` - Signature or algorithm does not match the public key
/// * `Expired` - `exp` is in the past
/// * `MalformedClaims` - Token structure, issuer or claim set is invalid
pub fn decode_claims(
    token: &str,
    key: &DecodingKey,
    issuer: &str,
) -> Result<TokenClaims, JwtError> {
    let mut validation = Validation::new(ALGORITHM);
    validation.leeway = 0;
    validation.set_issuer(&[issuer]);
    validation.set_required_spec_claims(&["exp", "iat", "iss", "sub"]);

    decode_with(token, key, &validation)
}

pub(crate) fn decode_with<T: DeserializeOwned>(
    token: &str,
    key: &DecodingKey,
    validation: &Validation,
) -> Result<T, JwtError> {
    decode::<T>(token, key, validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                JwtError::InvalidSignature
            }
            _ => JwtError::MalformedClaims(e.to_string()),
        })
}
