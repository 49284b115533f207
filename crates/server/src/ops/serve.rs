use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Args;

use service::spawn_service;

use crate::state::{AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Serve {
    /// Override the API listen address (default from config)
    #[arg(long)]
    pub listen_addr: Option<SocketAddr>,

    /// Directory for log files (default from config, stdout only if unset)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Override the log level (default from config)
    #[arg(long)]
    pub log_level: Option<tracing::Level>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),

    #[error("service failed: {0}")]
    Failed(#[from] service::ServiceError),
}

#[async_trait::async_trait]
impl crate::op::Op for Serve {
    type Error = ServeError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;
        let mut config = state.service_config()?;

        if let Some(listen_addr) = self.listen_addr {
            config.listen_addr = listen_addr;
        }
        if let Some(log_dir) = &self.log_dir {
            config.log_dir = Some(log_dir.clone());
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }

        spawn_service(&config).await?;
        Ok("service stopped".to_string())
    }
}
