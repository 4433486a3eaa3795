//! SQLite connection pools.
//!
//! Reads and writes go through separate pools over the same database file:
//! SQLite serializes writers, so the write side gets exactly one connection
//! while reads fan out across several. WAL journaling keeps readers from
//! stalling behind the writer.

use std::str::FromStr;
use std::time::Duration;

use codechat_types::config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

/// Paired read/write pools over one SQLite database.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open the database at `database_url`, creating the file if needed, and
    /// apply any pending migrations.
    ///
    /// Pool sizing and the busy timeout come from `config`. Both pools run
    /// in WAL mode with foreign keys enforced; the reader pool is opened
    /// read-only.
    pub async fn connect(
        database_url: &str,
        config: &DatabaseConfig,
    ) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(config.busy_timeout_secs))
            .create_if_missing(true);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await?;

        // Migrations need the writable connection and must finish before any
        // reader opens.
        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(config.max_read_connections)
            .connect_with(options.read_only(true))
            .await?;

        Ok(Self { reader, writer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open(name: &str) -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join(name).display());
        std::mem::forget(dir);
        DatabasePool::connect(&url, &DatabaseConfig::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_connect_applies_schema_and_pragmas() {
        let pool = open("schema.db").await;

        let tables: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type = 'table' AND name IN ('conversations', 'messages')",
        )
        .fetch_one(&pool.reader)
        .await
        .unwrap();
        assert_eq!(tables.0, 2);

        let journal: (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool.writer)
            .await
            .unwrap();
        assert_eq!(journal.0.to_lowercase(), "wal");

        let foreign_keys: (i32,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool.writer)
            .await
            .unwrap();
        assert_eq!(foreign_keys.0, 1);
    }

    #[tokio::test]
    async fn test_reader_pool_rejects_writes() {
        let pool = open("readonly.db").await;

        let result = sqlx::query(
            "INSERT INTO conversations (id, title, created_at) VALUES ('x', 't', 'now')",
        )
        .execute(&pool.reader)
        .await;

        assert!(result.is_err(), "reader pool accepted a write");
    }

    #[tokio::test]
    async fn test_busy_timeout_comes_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("tuned.db").display());
        std::mem::forget(dir);

        let config = DatabaseConfig {
            max_read_connections: 2,
            busy_timeout_secs: 1,
        };
        let pool = DatabasePool::connect(&url, &config).await.unwrap();

        let timeout_ms: (i64,) = sqlx::query_as("PRAGMA busy_timeout")
            .fetch_one(&pool.writer)
            .await
            .unwrap();
        assert_eq!(timeout_ms.0, 1_000);
    }
}
