use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use time::OffsetDateTime;

use super::provider::{IdentityError, IdentityProvider};
use super::{Identity, IdentityId, NewIdentity};
use crate::crypto::CredentialDigest;

/// In-memory credential store
#[derive(Debug, Clone)]
pub struct MemoryIdentityProvider {
    inner: Arc<RwLock<MemoryIdentityProviderInner>>,
}

#[derive(Debug, Default)]
struct MemoryIdentityProviderInner {
    next_id: IdentityId,
    identities: BTreeMap<IdentityId, Identity>,
    by_digest: HashMap<CredentialDigest, IdentityId>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryIdentityProviderError {
    #[error("memory provider error: {0}")]
    Internal(String),
}

fn poisoned(e: impl std::fmt::Display) -> IdentityError<MemoryIdentityProviderError> {
    IdentityError::Provider(MemoryIdentityProviderError::Internal(format!(
        "failed to acquire lock: {}",
        e
    )))
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryIdentityProviderInner::default())),
        }
    }
}

impl Default for MemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    type Error = MemoryIdentityProviderError;

    async fn insert(&self, new: NewIdentity) -> Result<Identity, IdentityError<Self::Error>> {
        let mut inner = self.inner.write().map_err(poisoned)?;

        if inner.by_digest.contains_key(&new.digest) {
            return Err(IdentityError::Conflict);
        }

        inner.next_id += 1;
        let identity = Identity {
            id: inner.next_id,
            name: new.name,
            role: new.role,
            active: true,
            created_at: OffsetDateTime::now_utc(),
        };
        inner.by_digest.insert(new.digest, identity.id);
        inner.identities.insert(identity.id, identity.clone());

        Ok(identity)
    }

    async fn find_by_digest(
        &self,
        digest: &CredentialDigest,
    ) -> Result<Option<Identity>, IdentityError<Self::Error>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner
            .by_digest
            .get(digest)
            .and_then(|id| inner.identities.get(id))
            .cloned())
    }

    async fn get(&self, id: IdentityId) -> Result<Option<Identity>, IdentityError<Self::Error>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.identities.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Identity>, IdentityError<Self::Error>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.identities.values().rev().cloned().collect())
    }

    async fn deactivate(&self, id: IdentityId) -> Result<bool, IdentityError<Self::Error>> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        match inner.identities.get_mut(&id) {
            Some(identity) => {
                identity.active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Role;

    fn new_identity(name: &str, secret: &str) -> NewIdentity {
        NewIdentity {
            name: name.to_string(),
            role: Role::Staff,
            digest: CredentialDigest::of(secret),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let provider = MemoryIdentityProvider::new();
        let a = provider.insert(new_identity("a", "one")).await.unwrap();
        let b = provider.insert(new_identity("b", "two")).await.unwrap();
        assert!(b.id > a.id);
        assert!(a.active && b.active);
    }

    #[tokio::test]
    async fn test_duplicate_digest_conflicts() {
        let provider = MemoryIdentityProvider::new();
        provider.insert(new_identity("a", "same")).await.unwrap();
        let result = provider.insert(new_identity("b", "same")).await;
        assert!(matches!(result, Err(IdentityError::Conflict)));
        assert_eq!(provider.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_digest() {
        let provider = MemoryIdentityProvider::new();
        let created = provider.insert(new_identity("a", "secret")).await.unwrap();

        let found = provider
            .find_by_digest(&CredentialDigest::of("secret"))
            .await
            .unwrap();
        assert_eq!(found, Some(created));

        let missing = provider
            .find_by_digest(&CredentialDigest::of("other"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_list_most_recent_first() {
        let provider = MemoryIdentityProvider::new();
        for (name, secret) in [("a", "1"), ("b", "2"), ("c", "3")] {
            provider.insert(new_identity(name, secret)).await.unwrap();
        }
        let names: Vec<_> = provider
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_deactivate_keeps_row() {
        let provider = MemoryIdentityProvider::new();
        let created = provider.insert(new_identity("a", "secret")).await.unwrap();

        assert!(provider.deactivate(created.id).await.unwrap());
        assert!(!provider.deactivate(created.id + 100).await.unwrap());

        let stored = provider.get(created.id).await.unwrap().unwrap();
        assert!(!stored.active);
        assert_eq!(provider.list().await.unwrap().len(), 1);
    }
}
