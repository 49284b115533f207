use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Prefix carried by every generated credential
pub const CREDENTIAL_PREFIX: &str = "rbk_";
/// Number of random bytes behind a credential
pub const CREDENTIAL_ENTROPY: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("failed to gather randomness: {0}")]
    Entropy(getrandom::Error),
}

/// A plaintext bearer secret
///
/// Only exists in memory long enough to be handed to the caller once.
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Generate a fresh credential from OS randomness
    pub fn generate() -> Result<Self, CredentialError> {
        let mut bytes = [0u8; CREDENTIAL_ENTROPY];
        getrandom::getrandom(&mut bytes).map_err(CredentialError::Entropy)?;
        Ok(Self(format!("{}{}", CREDENTIAL_PREFIX, hex::encode(bytes))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn digest(&self) -> CredentialDigest {
        CredentialDigest::of(&self.0)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for Credential {
    fn from(secret: String) -> Self {
        Self(secret)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Lowercase hex SHA-256 of a credential secret
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialDigest(String);

impl CredentialDigest {
    pub fn of(secret: &str) -> Self {
        let hash = Sha256::digest(secret.as_bytes());
        Self(hex::encode(hash))
    }

    /// Wrap a digest read back from storage
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CredentialDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // enough to correlate in logs, not enough to look up
        write!(f, "CredentialDigest({}..)", &self.0[..self.0.len().min(8)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_shape() {
        let credential = Credential::generate().unwrap();
        let secret = credential.as_str();
        assert!(secret.starts_with(CREDENTIAL_PREFIX));
        let body = &secret[CREDENTIAL_PREFIX.len()..];
        assert_eq!(body.len(), CREDENTIAL_ENTROPY * 2);
        assert!(body
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_generate_is_unique() {
        let a = Credential::generate().unwrap();
        let b = Credential::generate().unwrap();
        assert_ne!(a, b);
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn test_digest_matches_known_sha256() {
        assert_eq!(
            CredentialDigest::of("abc").as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            Credential::from("abc".to_string()).digest(),
            CredentialDigest::of("abc")
        );
    }

    #[test]
    fn test_debug_is_redacted() {
        let credential = Credential::generate().unwrap();
        let printed = format!("{:?}", credential);
        assert!(!printed.contains(credential.as_str()));

        let digest = credential.digest();
        let printed = format!("{:?}", digest);
        assert!(!printed.contains(digest.as_str()));
    }
}
