use url::Url;

use common::sync::{SyncConfig, SyncService};

use super::config::Config;
use super::database::{Database, DatabaseSetupError};

/// The sync engine over SQLite for both the credential store and the log
pub type SqliteSync = SyncService<Database, Database>;

/// Shared handler state
#[derive(Clone, Debug)]
pub struct State {
    database: Database,
    sync: SqliteSync,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        let database_url = database_url(config)?;
        tracing::info!(url = %database_url, "opening database");
        let database = Database::connect(&database_url).await?;

        Ok(Self::new(database, config.sync.clone()))
    }

    pub fn new(database: Database, sync_config: SyncConfig) -> Self {
        let sync = SyncService::new(database.clone(), database.clone(), sync_config);
        Self { database, sync }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn sync(&self) -> &SqliteSync {
        &self.sync
    }
}

/// `sqlite://<path>` for a configured path, an in-memory database otherwise
pub fn database_url(config: &Config) -> Result<Url, StateSetupError> {
    match config.sqlite_path {
        Some(ref path) => {
            // the file itself is created on connect, its directory is not
            let parent_missing = path
                .parent()
                .map(|p| !p.as_os_str().is_empty() && !p.exists())
                .unwrap_or(false);
            if parent_missing {
                return Err(StateSetupError::DatabasePathDoesNotExist);
            }
            Url::parse(&format!("sqlite://{}", path.display()))
                .map_err(|_| StateSetupError::InvalidDatabaseUrl)
        }
        None => Url::parse("sqlite::memory:").map_err(|_| StateSetupError::InvalidDatabaseUrl),
    }
}

impl AsRef<Database> for State {
    fn as_ref(&self) -> &Database {
        self.database()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("Database path does not exist")]
    DatabasePathDoesNotExist,
    #[error("Database setup error: {0}")]
    DatabaseSetupError(#[from] DatabaseSetupError),
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_defaults_to_memory() {
        let url = database_url(&Config::default()).unwrap();
        assert_eq!(url.as_str(), "sqlite::memory:");
    }

    #[test]
    fn test_database_url_requires_parent_dir() {
        let config = Config {
            sqlite_path: Some("/definitely/not/here/db.sqlite".into()),
            ..Config::default()
        };
        assert!(matches!(
            database_url(&config),
            Err(StateSetupError::DatabasePathDoesNotExist)
        ));
    }

    #[tokio::test]
    async fn test_from_config_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            sqlite_path: Some(dir.path().join("db.sqlite")),
            ..Config::default()
        };
        let state = State::from_config(&config).await.unwrap();
        state.database().ping().await.unwrap();
        assert!(dir.path().join("db.sqlite").exists());
    }
}
