use std::sync::Arc;

use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Validation;
use serde_json::json;

use super::codec::decode_with;
use super::codec::encode_claims;
use super::codec::ALGORITHM;
use super::errors::JwtError;

/// Public half of the token key pair.
///
/// Enough for services that only verify tokens.
#[derive(Clone)]
pub struct VerifyingKey {
    key: DecodingKey,
}

impl VerifyingKey {
    /// Load an RSA public key (SPKI or PKCS#1 PEM).
    ///
    /// # Errors
    /// * `KeyLoad` - PEM could not be parsed as an RSA public key
    pub fn from_pem(public_pem: &str) -> Result<Self, JwtError> {
        DecodingKey::from_rsa_pem(public_pem.as_bytes())
            .map(|key| Self { key })
            .map_err(|e| JwtError::KeyLoad(format!("public key: {}", e)))
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.key
    }
}

/// Immutable key pair used to sign and verify tokens.
///
/// Built once at startup and shared by reference; there is no ambient key.
pub struct SigningKeys {
    encoding: EncodingKey,
    verifying: Arc<VerifyingKey>,
}

impl SigningKeys {
    /// Load an RSA private key and its public key from PEM strings.
    ///
    /// A probe token is signed and verified so that a pair whose halves do
    /// not belong together fails here instead of on the first request.
    ///
    /// # Errors
    /// * `KeyLoad` - Either PEM is unreadable or the halves do not match
    pub fn from_pem(private_pem: &str, public_pem: &str) -> Result<Self, JwtError> {
        let encoding = EncodingKey::from_rsa_pem(private_pem.as_bytes())
            .map_err(|e| JwtError::KeyLoad(format!("private key: {}", e)))?;
        let verifying = VerifyingKey::from_pem(public_pem)?;

        let probe = encode_claims(&json!({ "probe": true }), &encoding)
            .map_err(|e| JwtError::KeyLoad(format!("private key: {}", e)))?;
        let mut validation = Validation::new(ALGORITHM);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        decode_with::<serde_json::Value>(&probe, verifying.decoding_key(), &validation)
            .map_err(|_| JwtError::KeyLoad("public key does not match private key".to_string()))?;

        Ok(Self {
            encoding,
            verifying: Arc::new(verifying),
        })
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    /// Shared handle to the public half.
    pub fn verifying_key(&self) -> Arc<VerifyingKey> {
        Arc::clone(&self.verifying)
    }
}
