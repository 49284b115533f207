use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use super::DatabaseSetupError;

pub(super) const IN_MEMORY_URL: &str = "sqlite::memory:";

fn is_in_memory(url: &url::Url) -> bool {
    url.as_str().contains(":memory:")
}

pub(super) async fn connect_sqlite(url: &url::Url) -> Result<SqlitePool, DatabaseSetupError> {
    let options = SqliteConnectOptions::from_str(url.as_str())
        .map_err(DatabaseSetupError::Unavailable)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    // every connection to :memory: is its own database, so keep exactly one alive
    let pool_options = if is_in_memory(url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(8)
    };

    pool_options
        .connect_with(options)
        .await
        .map_err(DatabaseSetupError::Unavailable)
}

pub(super) async fn migrate_sqlite(pool: &SqlitePool) -> Result<(), DatabaseSetupError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(DatabaseSetupError::MigrationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_on_disk_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.sqlite");
        let url = url::Url::parse(&format!("sqlite://{}", path.display())).unwrap();

        let pool = connect_sqlite(&url).await.unwrap();
        migrate_sqlite(&pool).await.unwrap();
        assert!(path.exists());

        // running migrations twice is a no-op
        migrate_sqlite(&pool).await.unwrap();
    }

    #[test]
    fn test_is_in_memory() {
        assert!(is_in_memory(&url::Url::parse(IN_MEMORY_URL).unwrap()));
        assert!(!is_in_memory(
            &url::Url::parse("sqlite:///var/lib/rollbook/db.sqlite").unwrap()
        ));
    }
}
