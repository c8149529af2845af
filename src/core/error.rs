//! Error types for key loading, request signing and rate fetching

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyLoadError {
    #[error("Failed to read private key file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to PEM decode private key: {0}")]
    Pem(String),
    #[error("Unsupported PEM block '{0}', expected 'RSA PRIVATE KEY' or 'PRIVATE KEY'")]
    UnsupportedLabel(String),
    #[error("Unable to parse PKCS#1 private key: {0}")]
    Pkcs1(String),
    #[error("Unable to parse PKCS#8 private key: {0}")]
    Pkcs8(String),
}

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("unsupported key type: {0}")]
    UnsupportedKey(String),
    #[error("signing failed: {0}")]
    Crypto(#[from] rsa::Error),
}

#[derive(Debug, Error)]
pub enum RateError {
    #[error("Invalid currency pair '{0}', expected six uppercase letters such as EURPLN")]
    InvalidPair(String),
    #[error("Failed to sign request for currency pair {pair}: {source}")]
    Signing {
        pair: String,
        #[source]
        source: SigningError,
    },
    #[error("Request error for currency pair {pair}: {source}")]
    Transport {
        pair: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to parse rate response for currency pair {pair}: {reason}")]
    Parse { pair: String, reason: String },
    #[error("Invalid timestamp '{value}' for currency pair {pair}: {source}")]
    TimeFormat {
        pair: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("API rejected request for currency pair {pair}: {message}")]
    Api { pair: String, message: String },
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl RateError {
    /// Currency pair the failed request was for, when there was one.
    pub fn pair(&self) -> Option<&str> {
        match self {
            RateError::InvalidPair(pair)
            | RateError::Signing { pair, .. }
            | RateError::Transport { pair, .. }
            | RateError::Parse { pair, .. }
            | RateError::TimeFormat { pair, .. }
            | RateError::Api { pair, .. } => Some(pair),
            RateError::Client(_) => None,
        }
    }
}
