use super::{SyncError, SyncService};
use crate::crypto::CredentialDigest;
use crate::identity::{Identity, IdentityProvider};
use crate::op_log::OpLogProvider;
use crate::policy::Permission;

/// Pull the secret out of an `Authorization` header value
///
/// Only the `Bearer` scheme (any case) counts. Returns `None` for other
/// schemes and for an empty secret.
pub fn bearer_credential(header: &str) -> Option<&str> {
    let (scheme, rest) = header.trim_start().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let secret = rest.trim();
    (!secret.is_empty()).then_some(secret)
}

impl<I, L> SyncService<I, L>
where
    I: IdentityProvider,
    L: OpLogProvider,
{
    /// Resolve a presented credential to an active identity
    pub async fn resolve(&self, credential: Option<&str>) -> Result<Identity, SyncError> {
        let secret = match credential.map(str::trim) {
            Some(secret) if !secret.is_empty() => secret,
            _ => return Err(SyncError::MissingCredential),
        };

        let digest = CredentialDigest::of(secret);
        match self.identities.find_by_digest(&digest).await? {
            Some(identity) if identity.active => Ok(identity),
            Some(identity) => {
                tracing::debug!(identity_id = identity.id, "credential belongs to a revoked identity");
                Err(SyncError::InvalidCredential)
            }
            None => Err(SyncError::InvalidCredential),
        }
    }

    /// `Forbidden` unless the identity's role grants `permission`
    pub fn require(identity: &Identity, permission: Permission) -> Result<(), SyncError> {
        if identity.role.grants(permission) {
            Ok(())
        } else {
            Err(SyncError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Credential;
    use crate::identity::{MemoryIdentityProvider, NewIdentity, Role};
    use crate::op_log::MemoryOpLog;
    use crate::sync::SyncConfig;

    async fn service_with(
        secret: &str,
    ) -> (SyncService<MemoryIdentityProvider, MemoryOpLog>, Identity) {
        let service = SyncService::new(
            MemoryIdentityProvider::new(),
            MemoryOpLog::new(),
            SyncConfig::default(),
        );
        let identity = service
            .identities()
            .insert(NewIdentity {
                name: "desk".to_string(),
                role: Role::Staff,
                digest: Credential::from(secret.to_string()).digest(),
            })
            .await
            .unwrap();
        (service, identity)
    }

    #[test]
    fn test_bearer_credential() {
        assert_eq!(bearer_credential("Bearer abc"), Some("abc"));
        assert_eq!(bearer_credential("bearer   abc  "), Some("abc"));
        assert_eq!(bearer_credential("BEARER abc"), Some("abc"));
        assert_eq!(bearer_credential("Basic abc"), None);
        assert_eq!(bearer_credential("Bearer   "), None);
        assert_eq!(bearer_credential("Bearer"), None);
        assert_eq!(bearer_credential(""), None);
    }

    #[tokio::test]
    async fn test_resolve_missing() {
        let (service, _) = service_with("s3cret").await;
        assert_eq!(service.resolve(None).await, Err(SyncError::MissingCredential));
        assert_eq!(
            service.resolve(Some("   ")).await,
            Err(SyncError::MissingCredential)
        );
    }

    #[tokio::test]
    async fn test_resolve_unknown_and_revoked() {
        let (service, identity) = service_with("s3cret").await;
        assert_eq!(
            service.resolve(Some("nope")).await,
            Err(SyncError::InvalidCredential)
        );

        assert_eq!(service.resolve(Some("s3cret")).await, Ok(identity.clone()));

        service.identities().deactivate(identity.id).await.unwrap();
        assert_eq!(
            service.resolve(Some("s3cret")).await,
            Err(SyncError::InvalidCredential)
        );
    }
}
