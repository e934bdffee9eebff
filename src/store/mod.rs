//! Document store built on SQLite.
//!
//! Each collection is a two-column table holding JSON documents keyed by a
//! store-assigned identifier. The pool connects lazily, so opening the store
//! never touches the filesystem; [`Store::ensure_ready`] creates the
//! collection tables and doubles as the startup connectivity probe.

mod collection;
mod document;

pub use collection::Collection;
pub use document::{DeleteResult, Document, DocumentId, InsertResult, UpdateResult, ID_FIELD};

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::AppError;

/// Schema creating the collection tables.
const COLLECTIONS_SCHEMA: &str = include_str!("../../migrations/001_create_collections.sql");

/// Process-wide handle to the document store. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open a store backed by the SQLite file at `path`, creating the file
    /// and its parent directory on first use.
    pub fn open(path: &str) -> Result<Self, AppError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("failed to create store directory: {e}"))
                })?;
            }
        }

        let connection_string = if path.starts_with("sqlite:") {
            path.to_string()
        } else {
            format!("sqlite:{path}")
        };

        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_lazy_with(options);

        debug!("document store configured at {path}");
        Ok(Self { pool })
    }

    /// Create the collection tables if they do not exist yet.
    ///
    /// Running the DDL is also the connectivity probe: callers spawn this at
    /// startup and only log the outcome, so an unreachable store leaves the
    /// server up with every store operation failing individually.
    pub async fn ensure_ready(&self) -> Result<(), AppError> {
        let schema: String = COLLECTIONS_SCHEMA
            .lines()
            .filter(|line| {
                let trimmed = line.trim();
                !trimmed.is_empty() && !trimmed.starts_with("--")
            })
            .collect::<Vec<_>>()
            .join(" ");

        for statement in schema.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(statement).execute(&self.pool).await.map_err(|e| {
                AppError::Internal(anyhow::anyhow!("collection bootstrap failed: {e}"))
            })?;
        }

        debug!("collection tables ready");
        Ok(())
    }

    /// Handle to the `services` collection.
    pub fn services(&self) -> Collection {
        Collection::new(self.pool.clone(), "services")
    }

    /// Handle to the `reviews` collection.
    pub fn reviews(&self) -> Collection {
        Collection::new(self.pool.clone(), "reviews")
    }

    /// Handle to the `users` collection.
    pub fn users(&self) -> Collection {
        Collection::new(self.pool.clone(), "users")
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("document store closed");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Store fixtures shared by unit tests.

    use tempfile::TempDir;

    use super::Store;

    /// Open a store in a throwaway directory with all collections created.
    /// The directory guard must stay alive for the duration of the test.
    pub(crate) async fn temp_store() -> (Store, TempDir) {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("store.db");
        let store = Store::open(path.to_str().expect("temp path is utf-8")).expect("open store");
        store.ensure_ready().await.expect("bootstrap collections");
        (store, dir)
    }
}
