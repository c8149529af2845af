//! Request signing for the direct FX API.
//!
//! Every request carries a signature over `timestamp + path + body`. The
//! message is hashed with SHA-256 and the digest is signed with the account's
//! private key (RSASSA-PKCS1-v1_5 for RSA keys), then base64 encoded for the
//! `X-API-Signature` header.

use super::error::SigningError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, SecondsFormat, Utc};
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha2::{Digest, Sha256};
use std::fmt;
use tracing::debug;

pub const API_KEY_HEADER: &str = "X-API-Key";
pub const SIGNATURE_HEADER: &str = "X-API-Signature";
pub const TIMESTAMP_HEADER: &str = "X-API-Timestamp";

/// Signs a precomputed SHA-256 digest with an asymmetric private key.
pub trait AsymmetricSigner: Send + Sync {
    fn algorithm(&self) -> &str;

    fn sign_digest(&self, digest: &[u8; 32]) -> Result<Vec<u8>, SigningError>;
}

/// Private key material loaded at startup.
pub enum SigningKey {
    Rsa(RsaPrivateKey),
    /// A well-formed key for an algorithm there is no signer for, identified
    /// by its algorithm OID.
    Unsupported { algorithm: String },
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigningKey::Rsa(_) => f.write_str("SigningKey::Rsa(..)"),
            SigningKey::Unsupported { algorithm } => f
                .debug_struct("SigningKey::Unsupported")
                .field("algorithm", algorithm)
                .finish(),
        }
    }
}

impl AsymmetricSigner for SigningKey {
    fn algorithm(&self) -> &str {
        match self {
            SigningKey::Rsa(_) => "rsa-pkcs1v15-sha256",
            SigningKey::Unsupported { algorithm } => algorithm,
        }
    }

    fn sign_digest(&self, digest: &[u8; 32]) -> Result<Vec<u8>, SigningError> {
        match self {
            SigningKey::Rsa(key) => Ok(key.sign(Pkcs1v15Sign::new::<Sha256>(), digest)?),
            SigningKey::Unsupported { algorithm } => {
                Err(SigningError::UnsupportedKey(algorithm.clone()))
            }
        }
    }
}

pub fn canonical_message(timestamp: &str, path: &str, body: &str) -> String {
    format!("{timestamp}{path}{body}")
}

/// Produces the base64 signature for one request.
pub fn sign_request(
    timestamp: &str,
    path: &str,
    body: &str,
    signer: &dyn AsymmetricSigner,
) -> Result<String, SigningError> {
    let digest: [u8; 32] = Sha256::digest(canonical_message(timestamp, path, body).as_bytes()).into();
    let signature = signer.sign_digest(&digest)?;
    Ok(STANDARD.encode(signature))
}

/// Formats a request timestamp the way the API expects it, e.g.
/// `2024-01-01T12:00:00Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Authentication header values for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub api_key: String,
    pub signature: String,
    pub timestamp: String,
}

impl SignedHeaders {
    pub fn to_pairs(&self) -> [(&'static str, &str); 3] {
        [
            (API_KEY_HEADER, self.api_key.as_str()),
            (SIGNATURE_HEADER, self.signature.as_str()),
            (TIMESTAMP_HEADER, self.timestamp.as_str()),
        ]
    }
}

/// Holds the account credentials for the whole run and signs GET requests.
pub struct RequestSigner {
    api_key: String,
    key: SigningKey,
}

impl RequestSigner {
    pub fn new(api_key: impl Into<String>, key: SigningKey) -> Self {
        Self {
            api_key: api_key.into(),
            key,
        }
    }

    /// Signs a body-less request to `path` stamped with the current time.
    pub fn sign_get(&self, path: &str) -> Result<SignedHeaders, SigningError> {
        self.sign_get_at(path, Utc::now())
    }

    pub fn sign_get_at(&self, path: &str, at: DateTime<Utc>) -> Result<SignedHeaders, SigningError> {
        let timestamp = format_timestamp(at);
        debug!(algorithm = self.key.algorithm(), %timestamp, path, "Signing request");
        let signature = sign_request(&timestamp, path, "", &self.key)?;
        Ok(SignedHeaders {
            api_key: self.api_key.clone(),
            signature,
            timestamp,
        })
    }
}
