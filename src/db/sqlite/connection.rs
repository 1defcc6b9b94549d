//! SQLite database connection and migration management.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::{debug, error, info};

use super::{SqliteApplicantRepository, SqliteEmployerRepository, SqliteNotificationRepository};
use crate::config::{DbConfig, DbLocation};
use crate::db::{Database, DbError, DbResult};

/// SQLite database implementation.
///
/// Provides access to repositories via associated types, avoiding dynamic dispatch.
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Open (creating if missing) a database file at the given path.
    pub async fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                DbError::internal(format!(
                    "failed to create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| {
                error!(error = %e, path = %path.display(), "failed to open database");
                DbError::internal(format!("failed to open database {}: {}", path.display(), e))
            })?;

        info!(path = %path.display(), "database opened");
        Ok(Self { pool })
    }

    /// Create an in-memory database (useful for testing).
    ///
    /// Each in-memory connection is its own database, so the pool holds
    /// exactly one connection for its whole lifetime.
    pub async fn in_memory() -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DbError::internal(format!("invalid in-memory options: {}", e)))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DbError::internal(format!("failed to open in-memory database: {}", e)))?;

        debug!("in-memory database opened");
        Ok(Self { pool })
    }

    /// Open the database a resolved [`DbConfig`] points at.
    pub async fn connect(config: &DbConfig) -> DbResult<Self> {
        match config.location() {
            DbLocation::Memory => Self::in_memory().await,
            DbLocation::File(path) => Self::open(path).await,
        }
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl Database for SqliteDatabase {
    type Applicants<'a> = SqliteApplicantRepository<'a>;
    type Employers<'a> = SqliteEmployerRepository<'a>;
    type Notifications<'a> = SqliteNotificationRepository<'a>;

    async fn migrate(&self) -> DbResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "migration failed");
                DbError::internal(format!("migration failed: {}", e))
            })?;

        debug!("migrations applied");
        Ok(())
    }

    fn applicants(&self) -> Self::Applicants<'_> {
        SqliteApplicantRepository { pool: &self.pool }
    }

    fn employers(&self) -> Self::Employers<'_> {
        SqliteEmployerRepository { pool: &self.pool }
    }

    fn notifications(&self) -> Self::Notifications<'_> {
        SqliteNotificationRepository { pool: &self.pool }
    }
}
