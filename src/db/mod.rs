//! Database module for persistent storage.
//!
//! Provides async SQLite database access using SQLx for the `users` table.
//! A failed [`Database::connect`] is a deployment defect: callers are expected
//! to abort rather than retry.

mod users;

pub use users::{ExistingUser, InsertResult, UserRecord, UserRepository};

use crate::config::DatabaseConfig;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::info;

static MEMDB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),
    #[error("migration error: {0}")]
    Migration(sqlx::migrate::MigrateError),
    #[error("database encoding is {0}, expected UTF-8")]
    Encoding(String),
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
}

/// Database handle with connection pool.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect using the given configuration, running migrations if needed.
    ///
    /// The returned handle has foreign keys on and UTF-8 text encoding.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbError> {
        let path = config.path.as_str();
        let pool = if config.is_memory() {
            // Use a uniquely named shared-cache memory database per call.
            // `file::memory:` is global-ish and will collide across parallel tests.
            let id = MEMDB_COUNTER.fetch_add(1, Ordering::Relaxed);
            let memdb_uri = format!(
                "file:board-api-memdb-{}-{}?mode=memory&cache=shared",
                std::process::id(),
                id
            );

            let options = SqliteConnectOptions::new()
                .filename(&memdb_uri)
                .shared_cache(true)
                .create_if_missing(true)
                .foreign_keys(true)
                .pragma("encoding", "'UTF-8'");

            // The shared-cache database vanishes with its last connection,
            // so the single connection is never reaped.
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .acquire_timeout(config.acquire_timeout())
                .idle_timeout(None)
                .max_lifetime(None)
                .test_before_acquire(true)
                .connect_with(options)
                .await?
        } else {
            // Create parent directory if it doesn't exist
            if let Some(parent) = Path::new(path).parent()
                && !parent.as_os_str().is_empty()
                && let Err(e) = std::fs::create_dir_all(parent)
            {
                tracing::warn!(path = %parent.display(), error = %e, "Failed to create database directory");
            }

            let options = SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .foreign_keys(true)
                .pragma("encoding", "'UTF-8'");

            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(config.acquire_timeout())
                .idle_timeout(Some(config.idle_timeout()))
                .test_before_acquire(true)
                .connect_with(options)
                .await?
        };

        info!(path = %path, "Database connected");

        Self::check_encoding(&pool).await?;
        Self::run_migrations(&pool).await?;

        if !config.is_memory() {
            // WAL lets reads proceed while an insert is in flight
            sqlx::query("PRAGMA journal_mode=WAL")
                .execute(&pool)
                .await?;
        }

        let integrity_result: String = sqlx::query_scalar("PRAGMA integrity_check")
            .fetch_one(&pool)
            .await?;

        if integrity_result != "ok" {
            tracing::error!(
                integrity_check = %integrity_result,
                "Database integrity check FAILED - corruption detected!"
            );
            return Err(DbError::Sqlx(sqlx::Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Database integrity check failed: {}", integrity_result),
            ))));
        }

        info!("Database integrity check passed");

        Ok(Self { pool })
    }

    /// Get reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get user repository.
    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.pool)
    }

    /// Reject databases whose text encoding is anything other than UTF-8.
    ///
    /// An existing file keeps the encoding it was created with, so the
    /// connect-time pragma alone is not enough.
    async fn check_encoding(pool: &SqlitePool) -> Result<(), DbError> {
        let encoding: String = sqlx::query_scalar("PRAGMA encoding")
            .fetch_one(pool)
            .await?;
        if encoding != "UTF-8" {
            return Err(DbError::Encoding(encoding));
        }
        Ok(())
    }

    /// Run embedded migrations.
    async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(DbError::Migration)?;

        info!("Database migrations checked/applied");
        Ok(())
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        DbError::Sqlx(err)
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_in_memory_reports_utf8() {
        let db = Database::connect(&DatabaseConfig::in_memory()).await.unwrap();
        let encoding: String = sqlx::query_scalar("PRAGMA encoding")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(encoding, "UTF-8");
    }

    #[tokio::test]
    async fn connect_creates_users_table() {
        let db = Database::connect(&DatabaseConfig::in_memory()).await.unwrap();
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'users'",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn in_memory_databases_are_isolated() {
        let a = Database::connect(&DatabaseConfig::in_memory()).await.unwrap();
        let b = Database::connect(&DatabaseConfig::in_memory()).await.unwrap();

        a.users().insert("alice", "a@x.com", "hash").await.unwrap();

        assert!(a.users().find_by_account("alice").await.unwrap().is_some());
        assert!(b.users().find_by_account("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn in_memory_data_survives_idle_period() {
        let config = DatabaseConfig {
            idle_timeout_secs: 1,
            ..DatabaseConfig::in_memory()
        };
        let db = Database::connect(&config).await.unwrap();
        db.users().insert("alice", "a@x.com", "hash").await.unwrap();

        tokio::time::sleep(std::time::Duration::from_secs(3)).await;

        let existing = db.users().check_existing("alice", "a@x.com").await.unwrap();
        assert!(existing.account_exists && existing.email_exists);
    }

    #[tokio::test]
    async fn connect_rejects_non_utf8_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("utf16.db");

        // Encoding is fixed once the first table is written.
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .pragma("encoding", "'UTF-16le'");
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::query("CREATE TABLE marker (id INTEGER)")
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;

        let config = DatabaseConfig {
            path: path.to_string_lossy().into_owned(),
            ..DatabaseConfig::in_memory()
        };
        let err = Database::connect(&config).await.unwrap_err();
        assert!(matches!(err, DbError::Encoding(ref enc) if enc == "UTF-16le"), "{err}");
    }

    #[tokio::test]
    async fn connect_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            path: dir.path().join("board.db").to_string_lossy().into_owned(),
            ..DatabaseConfig::in_memory()
        };

        let db = Database::connect(&config).await.unwrap();
        db.users().insert("alice", "a@x.com", "hash").await.unwrap();
        drop(db);

        // Reconnecting runs migrations again against the existing table.
        let db = Database::connect(&config).await.unwrap();
        assert!(db.users().find_by_account("alice").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn connect_unopenable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a database file.
        let config = DatabaseConfig {
            path: dir.path().to_string_lossy().into_owned(),
            ..DatabaseConfig::in_memory()
        };

        assert!(Database::connect(&config).await.is_err());
    }
}
