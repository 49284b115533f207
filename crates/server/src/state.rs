use std::net::SocketAddr;
use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use common::sync::SyncConfig;

pub const APP_NAME: &str = "rollbook";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "db.sqlite";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the sync API listens on
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    /// Default log level when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for a daily rolling log file (stdout only if unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    /// Browser origins allowed to call the API; empty or "*" echoes any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    #[serde(default)]
    pub sync: SyncConfig,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], service::config::DEFAULT_LISTEN_PORT))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_body_bytes() -> usize {
    service::http::DEFAULT_MAX_BODY_BYTES
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            log_level: default_log_level(),
            log_dir: None,
            allowed_origins: Vec::new(),
            max_body_bytes: default_max_body_bytes(),
            sync: SyncConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the rollbook directory (~/.rollbook)
    pub rollbook_dir: PathBuf,
    /// Path to the SQLite database
    pub db_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the rollbook directory path (custom or default ~/.rollbook)
    pub fn rollbook_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Create a new state directory with a config file
    ///
    /// The database file is left for the service to create and migrate.
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let rollbook_dir = Self::rollbook_dir(custom_path)?;

        if rollbook_dir.join(CONFIG_FILE_NAME).exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&rollbook_dir)?;

        let config = config.unwrap_or_default();
        let config_path = rollbook_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            db_path: rollbook_dir.join(DB_FILE_NAME),
            rollbook_dir,
            config_path,
            config,
        })
    }

    /// Load existing state from the rollbook directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let rollbook_dir = Self::rollbook_dir(custom_path)?;

        if !rollbook_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let db_path = rollbook_dir.join(DB_FILE_NAME);
        let config_path = rollbook_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }
        if !db_path.exists() {
            return Err(StateError::MissingFile(DB_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            rollbook_dir,
            db_path,
            config_path,
            config,
        })
    }

    /// Service settings derived from the config file
    pub fn service_config(&self) -> Result<service::ServiceConfig, StateError> {
        let log_level = self
            .config
            .log_level
            .parse::<tracing::Level>()
            .map_err(|_| StateError::InvalidLogLevel(self.config.log_level.clone()))?;

        Ok(service::ServiceConfig {
            listen_addr: self.config.listen_addr,
            sqlite_path: Some(self.db_path.clone()),
            log_level,
            log_dir: self.config.log_dir.clone(),
            allowed_origins: self.config.allowed_origins.clone(),
            max_body_bytes: self.config.max_body_bytes,
            sync: self.config.sync.clone(),
        })
    }

    /// Open the service state against this directory's database
    pub async fn open(&self) -> Result<service::ServiceState, StateError> {
        let config = self.service_config()?;
        Ok(service::ServiceState::from_config(&config).await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("rollbook directory not initialized. Run 'rollbook init' first")]
    NotInitialized,

    #[error("rollbook directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("service state error: {0}")]
    Service(#[from] service::StateSetupError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state");

        let state = AppState::init(Some(path.clone()), None).unwrap();
        assert!(state.config_path.exists());
        assert!(matches!(
            AppState::init(Some(path.clone()), None),
            Err(StateError::AlreadyInitialized)
        ));

        // no database yet
        assert!(matches!(
            AppState::load(Some(path.clone())),
            Err(StateError::MissingFile(_))
        ));

        fs::write(&state.db_path, "").unwrap();
        let loaded = AppState::load(Some(path)).unwrap();
        assert_eq!(loaded.config.listen_addr, default_listen_addr());
        assert_eq!(loaded.config.sync, SyncConfig::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            allowed_origins = ["https://school.example"]

            [sync]
            max_push_batch = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.allowed_origins, vec!["https://school.example"]);
        assert_eq!(config.sync.max_push_batch, 50);
        assert_eq!(config.sync.max_pull_limit, 800);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_load_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            AppState::load(Some(dir.path().join("absent"))),
            Err(StateError::NotInitialized)
        ));
    }

    #[test]
    fn test_service_config_rejects_bad_level() {
        let state = AppState {
            rollbook_dir: PathBuf::from("/tmp/x"),
            db_path: PathBuf::from("/tmp/x/db.sqlite"),
            config_path: PathBuf::from("/tmp/x/config.toml"),
            config: AppConfig {
                log_level: "loud".to_string(),
                ..AppConfig::default()
            },
        };
        assert!(matches!(
            state.service_config(),
            Err(StateError::InvalidLogLevel(_))
        ));
    }
}
