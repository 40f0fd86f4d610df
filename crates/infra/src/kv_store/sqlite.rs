//! SQLite-backed key-value store (feature `sqlite`).

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tokio::runtime::Runtime;

use super::r#trait::{KeyValueStore, StorageError, validate_key};

/// SQLite key-value store.
///
/// The public API is synchronous; queries run on a private current-thread
/// tokio runtime via `block_on`.
#[derive(Debug)]
pub struct SqliteKeyValueStore {
    runtime: Runtime,
    pool: SqlitePool,
}

impl SqliteKeyValueStore {
    /// Open (creating if needed) a database file.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create database directory at {:?}", parent))?;
        }
        let url = format!("sqlite://{}?mode=rwc", path.to_string_lossy());
        Self::connect(&url)
    }

    /// Private in-memory database (tests, throwaway sessions).
    pub fn in_memory() -> anyhow::Result<Self> {
        Self::connect("sqlite::memory:")
    }

    fn connect(url: &str) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to create runtime for SqliteKeyValueStore")?;

        let pool = runtime.block_on(async {
            // One long-lived connection: an in-memory database lives only as
            // long as its connection.
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(url)
                .await
                .with_context(|| format!("failed to open SQLite database at {url}"))?;

            sqlx::query(
                r#"
                CREATE TABLE IF NOT EXISTS kv_entries (
                    key        TEXT PRIMARY KEY NOT NULL,
                    value      TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
                "#,
            )
            .execute(&pool)
            .await
            .context("failed to create kv_entries table")?;

            Ok::<_, anyhow::Error>(pool)
        })?;

        tracing::debug!(url, "opened SQLite key-value store");
        Ok(Self { runtime, pool })
    }
}

fn unavailable(err: sqlx::Error) -> StorageError {
    StorageError::Unavailable(err.to_string())
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        self.runtime.block_on(async {
            let row = sqlx::query(
                r#"
                SELECT value
                FROM kv_entries
                WHERE key = ?1
                "#,
            )
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?;

            match row {
                Some(row) => Ok(Some(row.try_get::<String, _>("value").map_err(unavailable)?)),
                None => Ok(None),
            }
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let now = Utc::now().to_rfc3339();
        self.runtime.block_on(async {
            sqlx::query(
                r#"
                INSERT INTO kv_entries (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key)
                DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(key)
            .bind(value)
            .bind(&now)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.runtime.block_on(async {
            sqlx::query(
                r#"
                DELETE FROM kv_entries
                WHERE key = ?1
                "#,
            )
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;
            Ok(())
        })
    }
}

impl Drop for SqliteKeyValueStore {
    fn drop(&mut self) {
        self.runtime.block_on(self.pool.close());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_and_remove() {
        let store = SqliteKeyValueStore::in_memory().unwrap();
        assert_eq!(store.get("inventory").unwrap(), None);

        store.set("inventory", "[]").unwrap();
        store.set("inventory", "[{}]").unwrap();
        assert_eq!(store.get("inventory").unwrap().as_deref(), Some("[{}]"));

        store.remove("inventory").unwrap();
        assert_eq!(store.get("inventory").unwrap(), None);
    }

    #[test]
    fn file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockroom.db");

        {
            let store = SqliteKeyValueStore::open(&path).unwrap();
            store.set("inventory", "[1,2]").unwrap();
        }

        let store = SqliteKeyValueStore::open(&path).unwrap();
        assert_eq!(store.get("inventory").unwrap().as_deref(), Some("[1,2]"));
    }
}
