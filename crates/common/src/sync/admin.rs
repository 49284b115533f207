use serde::Serialize;
use serde_json::Value;

use super::{SyncError, SyncService};
use crate::crypto::Credential;
use crate::identity::{Identity, IdentityId, IdentityProvider, NewIdentity, Role};
use crate::op_log::OpLogProvider;
use crate::policy::Permission;

/// A freshly created identity along with the only copy of its credential
#[derive(Debug, Clone, Serialize)]
pub struct CreatedIdentity {
    pub credential: Credential,
    pub identity: Identity,
}

/// Read an identity id out of a JSON body field
///
/// Accepts integers and integer strings. Anything else becomes 0, which
/// `revoke_identity` refuses.
pub fn identity_id_from_json(value: Option<&Value>) -> IdentityId {
    match value {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

impl<I, L> SyncService<I, L>
where
    I: IdentityProvider,
    L: OpLogProvider,
{
    /// Create an identity without an authenticated caller
    ///
    /// Used by the offline bootstrap; the HTTP path goes through
    /// [`SyncService::create_identity`].
    pub async fn enroll(
        &self,
        name: &str,
        role: Option<&str>,
    ) -> Result<CreatedIdentity, SyncError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SyncError::InvalidRequest("missing name".to_string()));
        }
        let role = match role.map(str::trim).filter(|r| !r.is_empty()) {
            Some(role) => role
                .parse::<Role>()
                .map_err(|_| SyncError::InvalidRequest("invalid role".to_string()))?,
            None => Role::default(),
        };

        let credential = Credential::generate()
            .map_err(|e| SyncError::Storage(e.to_string()))?;
        let identity = self
            .identities
            .insert(NewIdentity {
                name: name.to_string(),
                role,
                digest: credential.digest(),
            })
            .await?;

        tracing::info!(identity_id = identity.id, role = %identity.role, "identity created");

        Ok(CreatedIdentity {
            credential,
            identity,
        })
    }

    pub async fn create_identity(
        &self,
        caller: &Identity,
        name: &str,
        role: Option<&str>,
    ) -> Result<CreatedIdentity, SyncError> {
        Self::require(caller, Permission::Privileged)?;
        self.enroll(name, role).await
    }

    pub async fn list_identities(&self, caller: &Identity) -> Result<Vec<Identity>, SyncError> {
        Self::require(caller, Permission::Privileged)?;
        Ok(self.identities.list().await?)
    }

    /// Deactivate an identity. The row, and every op it submitted, stays.
    pub async fn revoke_identity(
        &self,
        caller: &Identity,
        id: IdentityId,
    ) -> Result<(), SyncError> {
        Self::require(caller, Permission::Privileged)?;
        if id <= 0 {
            return Err(SyncError::InvalidRequest("missing identityId".to_string()));
        }
        if !self.identities.deactivate(id).await? {
            return Err(SyncError::NotFound(format!("identity {}", id)));
        }

        tracing::info!(identity_id = id, revoked_by = caller.id, "identity revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::MemoryIdentityProvider;
    use crate::op_log::MemoryOpLog;
    use crate::sync::SyncConfig;
    use serde_json::json;

    fn service() -> SyncService<MemoryIdentityProvider, MemoryOpLog> {
        SyncService::new(
            MemoryIdentityProvider::new(),
            MemoryOpLog::new(),
            SyncConfig::default(),
        )
    }

    #[test]
    fn test_identity_id_from_json() {
        assert_eq!(identity_id_from_json(Some(&json!(5))), 5);
        assert_eq!(identity_id_from_json(Some(&json!("12"))), 12);
        assert_eq!(identity_id_from_json(Some(&json!(1.5))), 0);
        assert_eq!(identity_id_from_json(Some(&json!("x"))), 0);
        assert_eq!(identity_id_from_json(Some(&json!(null))), 0);
        assert_eq!(identity_id_from_json(None), 0);
    }

    #[tokio::test]
    async fn test_enroll_validation() {
        let service = service();
        assert_eq!(
            service.enroll("   ", None).await.unwrap_err(),
            SyncError::InvalidRequest("missing name".to_string())
        );
        assert_eq!(
            service.enroll("Ana", Some("owner")).await.unwrap_err(),
            SyncError::InvalidRequest("invalid role".to_string())
        );

        let created = service.enroll("  Ana ", None).await.unwrap();
        assert_eq!(created.identity.name, "Ana");
        assert_eq!(created.identity.role, Role::Staff);
        assert!(created.identity.active);
    }

    #[tokio::test]
    async fn test_staff_cannot_administer() {
        let service = service();
        let staff = service.enroll("desk", Some("staff")).await.unwrap().identity;

        assert_eq!(
            service.create_identity(&staff, "x", None).await.unwrap_err(),
            SyncError::Forbidden
        );
        assert_eq!(
            service.list_identities(&staff).await.unwrap_err(),
            SyncError::Forbidden
        );
        assert_eq!(
            service.revoke_identity(&staff, staff.id).await.unwrap_err(),
            SyncError::Forbidden
        );
    }

    #[tokio::test]
    async fn test_revoke() {
        let service = service();
        let admin = service.enroll("root", Some("admin")).await.unwrap().identity;
        let created = service.create_identity(&admin, "desk", None).await.unwrap();

        assert!(matches!(
            service.revoke_identity(&admin, 0).await,
            Err(SyncError::InvalidRequest(_))
        ));
        assert!(matches!(
            service.revoke_identity(&admin, 999).await,
            Err(SyncError::NotFound(_))
        ));

        service
            .revoke_identity(&admin, created.identity.id)
            .await
            .unwrap();
        assert_eq!(
            service.resolve(Some(created.credential.as_str())).await,
            Err(SyncError::InvalidCredential)
        );
        assert_eq!(service.list_identities(&admin).await.unwrap().len(), 2);
    }
}
