use std::fmt::{Debug, Display};

use async_trait::async_trait;

use super::{Identity, IdentityId, NewIdentity};
use crate::crypto::CredentialDigest;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError<T> {
    #[error("unhandled identity provider error: {0}")]
    Provider(#[from] T),
    /// Another identity already holds this credential digest
    #[error("credential already registered")]
    Conflict,
}

/// Storage for identities, keyed by id and by credential digest
#[async_trait]
pub trait IdentityProvider: Send + Sync + Debug + Clone + 'static {
    type Error: Display + Debug;

    /// Register a new, active identity
    ///
    /// Fails with `IdentityError::Conflict` if the digest is already taken.
    async fn insert(&self, new: NewIdentity) -> Result<Identity, IdentityError<Self::Error>>;

    /// Look up an identity by the digest of its credential, active or not
    async fn find_by_digest(
        &self,
        digest: &CredentialDigest,
    ) -> Result<Option<Identity>, IdentityError<Self::Error>>;

    async fn get(&self, id: IdentityId) -> Result<Option<Identity>, IdentityError<Self::Error>>;

    /// All identities, most recently created first
    async fn list(&self) -> Result<Vec<Identity>, IdentityError<Self::Error>>;

    /// Mark an identity inactive
    ///
    /// # Returns
    /// * `Ok(true)` - the identity exists (it may already have been inactive)
    /// * `Ok(false)` - no identity has this id
    async fn deactivate(&self, id: IdentityId) -> Result<bool, IdentityError<Self::Error>>;
}
