use std::net::SocketAddr;

use clap::Args;

use common::identity::Role;
use common::sync::SyncError;

use crate::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// API listen address
    #[arg(long, default_value = "0.0.0.0:8787")]
    pub listen_addr: SocketAddr,

    /// Browser origin allowed to call the API (repeatable, default: any)
    #[arg(long = "allowed-origin")]
    pub allowed_origins: Vec<String>,

    /// Name of the first admin identity
    #[arg(long, default_value = "Administrator")]
    pub admin_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
    #[error("failed to create the first admin: {0}")]
    Bootstrap(#[from] SyncError),
}

#[async_trait::async_trait]
impl crate::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            listen_addr: self.listen_addr,
            allowed_origins: self.allowed_origins.clone(),
            ..AppConfig::default()
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;
        let service_state = state.open().await?;
        let admin = service_state
            .sync()
            .enroll(&self.admin_name, Some(Role::Admin.as_str()))
            .await?;

        let output = format!(
            "Initialized rollbook directory at: {}\n\
             - Database: {}\n\
             - Config: {}\n\
             - API listen address: {}\n\
             \n\
             Admin identity #{} ({}) created. Its credential is shown only once:\n\
             \n\
             {}",
            state.rollbook_dir.display(),
            state.db_path.display(),
            state.config_path.display(),
            state.config.listen_addr,
            admin.identity.id,
            admin.identity.name,
            admin.credential.as_str(),
        );

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::{Op, OpContext};
    use common::identity::IdentityProvider;

    #[tokio::test]
    async fn test_init_bootstraps_admin() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = OpContext::new(
            url::Url::parse("http://localhost:8787").unwrap(),
            Some(dir.path().join("rb")),
            None,
        )
        .unwrap();

        let init = Init {
            listen_addr: "127.0.0.1:8787".parse().unwrap(),
            allowed_origins: vec![],
            admin_name: "Principal".to_string(),
        };
        let output = init.execute(&ctx).await.unwrap();
        let credential = output.lines().last().unwrap().trim().to_string();
        assert!(credential.starts_with("rbk_"));

        let state = AppState::load(ctx.config_path.clone()).unwrap();
        let service_state = state.open().await.unwrap();
        let identity = service_state
            .sync()
            .resolve(Some(&credential))
            .await
            .unwrap();
        assert_eq!(identity.name, "Principal");
        assert_eq!(identity.role, Role::Admin);
        assert_eq!(service_state.database().list().await.unwrap().len(), 1);

        assert!(matches!(
            init.execute(&ctx).await,
            Err(InitError::StateFailed(StateError::AlreadyInitialized))
        ));
    }
}
