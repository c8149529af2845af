//! Core business logic abstractions

pub mod config;
pub mod error;
pub mod keys;
pub mod log;
pub mod rate;
pub mod signer;

// Re-export main types for cleaner imports
pub use error::{KeyLoadError, RateError, SigningError};
pub use rate::{DEFAULT_PAIRS, ExchangeRate, RateProvider};
pub use signer::{AsymmetricSigner, RequestSigner, SigningKey};
