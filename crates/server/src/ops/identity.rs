//! Offline identity management, straight against the local database.
//! Useful when no admin credential is at hand, e.g. after losing the bootstrap one.

use clap::{Args, Subcommand};

use common::identity::{Identity as Record, IdentityError, IdentityId, IdentityProvider};
use common::sync::SyncError;
use service::Database;

use crate::op::{Op, OpContext};
use crate::state::{AppState, StateError};

crate::command_enum! {
    (Create, Create),
    (List, List),
    (Revoke, Revoke),
}

pub type IdentityCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Identity {
    #[command(subcommand)]
    pub command: IdentityCommand,
}

#[async_trait::async_trait]
impl Op for Identity {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityOpError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error(transparent)]
    Rejected(#[from] SyncError),
    #[error("database error: {0}")]
    Database(#[from] IdentityError<<Database as IdentityProvider>::Error>),
    #[error("no identity with id {0}")]
    NotFound(IdentityId),
}

pub(crate) fn render_identities(identities: &[Record]) -> String {
    if identities.is_empty() {
        return "No identities found".to_string();
    }
    identities
        .iter()
        .map(|identity| {
            format!(
                "{} (id: {} | role: {} | {} | since: {})",
                identity.name,
                identity.id,
                identity.role,
                if identity.active { "active" } else { "revoked" },
                identity.created_at
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Args, Debug, Clone)]
pub struct Create {
    /// Display name for the new identity
    #[arg(long)]
    pub name: String,

    /// Either `staff` (the default) or `admin`
    #[arg(long)]
    pub role: Option<String>,
}

#[async_trait::async_trait]
impl Op for Create {
    type Error = IdentityOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?.open().await?;
        let created = state.sync().enroll(&self.name, self.role.as_deref()).await?;
        Ok(format!(
            "Created {} (id: {} | role: {})\ncredential (shown once): {}",
            created.identity.name,
            created.identity.id,
            created.identity.role,
            created.credential.as_str()
        ))
    }
}

#[derive(Args, Debug, Clone)]
pub struct List;

#[async_trait::async_trait]
impl Op for List {
    type Error = IdentityOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?.open().await?;
        let identities = state.database().list().await?;
        Ok(render_identities(&identities))
    }
}

#[derive(Args, Debug, Clone)]
pub struct Revoke {
    /// Id of the identity to deactivate
    #[arg(long)]
    pub identity_id: IdentityId,
}

#[async_trait::async_trait]
impl Op for Revoke {
    type Error = IdentityOpError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?.open().await?;
        if !state.database().deactivate(self.identity_id).await? {
            return Err(IdentityOpError::NotFound(self.identity_id));
        }
        Ok(format!("Revoked identity {}", self.identity_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::identity::Role;

    async fn initialized() -> (tempfile::TempDir, OpContext) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rb");
        let state = AppState::init(Some(path.clone()), None).unwrap();
        // opening creates and migrates the database
        state.open().await.unwrap();
        let ctx = OpContext::new(
            url::Url::parse("http://localhost:8787").unwrap(),
            Some(path),
            None,
        )
        .unwrap();
        (dir, ctx)
    }

    #[tokio::test]
    async fn test_offline_lifecycle() {
        let (_dir, ctx) = initialized().await;

        let output = Create {
            name: "Front desk".to_string(),
            role: None,
        }
        .execute(&ctx)
        .await
        .unwrap();
        assert!(output.contains("role: staff"));
        assert!(output.contains("rbk_"));

        let listed = List.execute(&ctx).await.unwrap();
        assert!(listed.contains("Front desk"));
        assert!(listed.contains("active"));

        let state = AppState::load(ctx.config_path.clone())
            .unwrap()
            .open()
            .await
            .unwrap();
        let id = state.database().list().await.unwrap()[0].id;
        assert_eq!(state.database().list().await.unwrap()[0].role, Role::Staff);

        Revoke { identity_id: id }.execute(&ctx).await.unwrap();
        assert!(List.execute(&ctx).await.unwrap().contains("revoked"));

        assert!(matches!(
            Revoke { identity_id: 999 }.execute(&ctx).await,
            Err(IdentityOpError::NotFound(999))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_role() {
        let (_dir, ctx) = initialized().await;
        let result = Create {
            name: "x".to_string(),
            role: Some("owner".to_string()),
        }
        .execute(&ctx)
        .await;
        assert!(matches!(
            result,
            Err(IdentityOpError::Rejected(SyncError::InvalidRequest(_)))
        ));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_identities(&[]), "No identities found");
    }
}
