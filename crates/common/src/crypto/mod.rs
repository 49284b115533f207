//! Bearer credentials and their stored digests
//!
//! A device authenticates with an opaque bearer secret. The server only ever
//! keeps the hex SHA-256 digest of that secret, so a leaked database does not
//! leak usable credentials.
//!
//! - [`Credential`]: the plaintext secret, shown once when an identity is created
//! - [`CredentialDigest`]: what the credential store indexes and compares

mod credential;

pub use credential::{Credential, CredentialDigest, CredentialError, CREDENTIAL_PREFIX};
