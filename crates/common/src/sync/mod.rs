//! The transport-free sync engine
//!
//! [`SyncService`] ties a credential store and an operation log together and
//! exposes the handful of things a device or an admin can do: resolve a
//! credential, push a batch, pull a page, and manage identities. The HTTP
//! layer is a thin shell around it.

mod admin;
mod auth;
mod config;
mod error;
mod pull;
mod push;

use crate::identity::IdentityProvider;
use crate::op_log::OpLogProvider;

pub use admin::{identity_id_from_json, CreatedIdentity};
pub use auth::bearer_credential;
pub use config::SyncConfig;
pub use error::SyncError;
pub use pull::PullPage;
pub use push::PushSummary;

#[derive(Debug, Clone)]
pub struct SyncService<I, L> {
    identities: I,
    log: L,
    config: SyncConfig,
}

impl<I, L> SyncService<I, L>
where
    I: IdentityProvider,
    L: OpLogProvider,
{
    pub fn new(identities: I, log: L, config: SyncConfig) -> Self {
        Self {
            identities,
            log,
            config,
        }
    }

    pub fn identities(&self) -> &I {
        &self.identities
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }
}
