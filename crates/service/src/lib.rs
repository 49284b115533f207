//! Storage, HTTP API and process bootstrap for the Rollbook sync service.
//!
//! - Database (SQLite implementing the credential store and the operation log)
//! - State (the sync engine wired to the database)
//! - HTTP routes, CORS, health checks and a typed API client
//! - Process bootstrap (logging, signals, graceful shutdown)

pub mod config;
pub mod database;
pub mod http;
pub mod process;
pub mod state;

// Re-export key types for convenience
pub use config::Config as ServiceConfig;
pub use database::{Database, DatabaseSetupError};
pub use crate::http::Config as HttpConfig;
pub use process::{spawn_service, ServiceError};
pub use state::{SqliteSync, State as ServiceState, StateSetupError};
