//! Loading of PEM encoded private keys

use super::error::KeyLoadError;
use super::signer::SigningKey;
use rsa::RsaPrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::{PrivateKeyInfo, SecretDocument};
use std::path::Path;
use tracing::debug;

const PKCS1_LABEL: &str = "RSA PRIVATE KEY";
const PKCS8_LABEL: &str = "PRIVATE KEY";

pub fn load_signing_key<P: AsRef<Path>>(path: P) -> Result<SigningKey, KeyLoadError> {
    let path = path.as_ref();
    debug!("Loading private key from {}", path.display());
    let pem = std::fs::read_to_string(path).map_err(|source| KeyLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_signing_key(&pem)
}

/// Parses a PKCS#1 (`RSA PRIVATE KEY`) or PKCS#8 (`PRIVATE KEY`) PEM block.
///
/// PKCS#8 keys for algorithms other than RSA are returned as
/// [`SigningKey::Unsupported`] so the failure surfaces when signing.
pub fn parse_signing_key(pem: &str) -> Result<SigningKey, KeyLoadError> {
    let (label, document) =
        SecretDocument::from_pem(pem.trim()).map_err(|e| KeyLoadError::Pem(e.to_string()))?;

    match label {
        PKCS1_LABEL => RsaPrivateKey::from_pkcs1_der(document.as_bytes())
            .map(SigningKey::Rsa)
            .map_err(|e| KeyLoadError::Pkcs1(e.to_string())),
        PKCS8_LABEL => {
            let info = PrivateKeyInfo::try_from(document.as_bytes())
                .map_err(|e| KeyLoadError::Pkcs8(e.to_string()))?;
            if info.algorithm.oid == rsa::pkcs1::ALGORITHM_OID {
                RsaPrivateKey::try_from(info)
                    .map(SigningKey::Rsa)
                    .map_err(|e| KeyLoadError::Pkcs8(e.to_string()))
            } else {
                let algorithm = info.algorithm.oid.to_string();
                debug!(%algorithm, "Loaded private key without a signer");
                Ok(SigningKey::Unsupported { algorithm })
            }
        }
        other => Err(KeyLoadError::UnsupportedLabel(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SigningError;
    use crate::core::signer::{AsymmetricSigner, sign_request};
    use std::io::Write;

    const PKCS1_PEM: &str = include_str!("../../tests/fixtures/test_rsa_pkcs1.pem");
    const PKCS8_PEM: &str = include_str!("../../tests/fixtures/test_rsa_pkcs8.pem");
    const ED25519_PEM: &str = include_str!("../../tests/fixtures/test_ed25519.pem");

    #[test]
    fn test_parse_pkcs1_key() {
        let key = parse_signing_key(PKCS1_PEM).unwrap();
        assert!(matches!(key, SigningKey::Rsa(_)));
        assert_eq!(key.algorithm(), "rsa-pkcs1v15-sha256");
    }

    #[test]
    fn test_pkcs1_and_pkcs8_keys_sign_identically() {
        let pkcs1 = parse_signing_key(PKCS1_PEM).unwrap();
        let pkcs8 = parse_signing_key(PKCS8_PEM).unwrap();
        assert_eq!(
            sign_request("2024-01-01T12:00:00Z", "/path", "", &pkcs1).unwrap(),
            sign_request("2024-01-01T12:00:00Z", "/path", "", &pkcs8).unwrap()
        );
    }

    #[test]
    fn test_non_rsa_pkcs8_key_is_unsupported() {
        let key = parse_signing_key(ED25519_PEM).unwrap();
        assert_eq!(key.algorithm(), "1.3.101.112");
        let result = sign_request("2024-01-01T12:00:00Z", "/path", "", &key);
        assert!(matches!(result, Err(SigningError::UnsupportedKey(_))));
    }

    #[test]
    fn test_not_pem() {
        let result = parse_signing_key("definitely not a key");
        assert!(matches!(result, Err(KeyLoadError::Pem(_))));
    }

    #[test]
    fn test_unknown_pem_label() {
        let pem = PKCS8_PEM
            .replace("BEGIN PRIVATE KEY", "BEGIN CERTIFICATE")
            .replace("END PRIVATE KEY", "END CERTIFICATE");
        let result = parse_signing_key(&pem);
        assert!(matches!(result, Err(KeyLoadError::UnsupportedLabel(ref l)) if l == "CERTIFICATE"));
    }

    #[test]
    fn test_pkcs1_label_with_pkcs8_body() {
        let pem = PKCS8_PEM
            .replace("BEGIN PRIVATE KEY", "BEGIN RSA PRIVATE KEY")
            .replace("END PRIVATE KEY", "END RSA PRIVATE KEY");
        let result = parse_signing_key(&pem);
        assert!(matches!(result, Err(KeyLoadError::Pkcs1(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PKCS1_PEM.as_bytes()).unwrap();
        let key = load_signing_key(file.path()).unwrap();
        assert!(matches!(key, SigningKey::Rsa(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_signing_key("/nonexistent/fxrates/key.pem");
        let err = result.unwrap_err();
        assert!(matches!(err, KeyLoadError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/fxrates/key.pem"));
    }
}
