//! Configuration loading and representation.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;

use crate::kv_store::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};

/// Environment variable selecting the storage backend.
pub const STORAGE_ENV: &str = "STOCKROOM_STORAGE";
/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "STOCKROOM_DATA_DIR";

/// Which persistence facility backs the inventory.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Nothing survives the process.
    Memory,
    /// One JSON file per key under the data directory.
    #[default]
    File,
    /// `stockroom.db` under the data directory (feature `sqlite`).
    Sqlite,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::File => "file",
            StorageBackend::Sqlite => "sqlite",
        }
    }
}

impl core::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            "sqlite" => Ok(StorageBackend::Sqlite),
            other => Err(format!(
                "unknown storage backend {other:?} (expected memory, file or sqlite)"
            )),
        }
    }
}

/// Storage settings resolved from the environment (and CLI overrides).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// Read `STOCKROOM_STORAGE` / `STOCKROOM_DATA_DIR`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`StorageConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let backend = match lookup(STORAGE_ENV) {
            Some(raw) => raw.parse::<StorageBackend>().unwrap_or_else(|err: String| {
                tracing::warn!("{err}; using {}", StorageBackend::default());
                StorageBackend::default()
            }),
            None => StorageBackend::default(),
        };

        let data_dir = lookup(DATA_DIR_ENV)
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        Self { backend, data_dir }
    }

    /// Construct the configured persistence facility.
    pub fn open_store(&self) -> anyhow::Result<Box<dyn KeyValueStore>> {
        tracing::info!(
            backend = %self.backend,
            data_dir = %self.data_dir.display(),
            "opening storage"
        );
        match self.backend {
            StorageBackend::Memory => Ok(Box::new(InMemoryKeyValueStore::new())),
            StorageBackend::File => {
                let store = FileKeyValueStore::open(&self.data_dir).with_context(|| {
                    format!("failed to open data directory at {:?}", self.data_dir)
                })?;
                Ok(Box::new(store))
            }
            StorageBackend::Sqlite => open_sqlite(&self.data_dir),
        }
    }
}

#[cfg(feature = "sqlite")]
fn open_sqlite(data_dir: &std::path::Path) -> anyhow::Result<Box<dyn KeyValueStore>> {
    let store = crate::kv_store::SqliteKeyValueStore::open(&data_dir.join("stockroom.db"))?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "sqlite"))]
fn open_sqlite(_data_dir: &std::path::Path) -> anyhow::Result<Box<dyn KeyValueStore>> {
    anyhow::bail!("sqlite storage requires building with the `sqlite` feature")
}

/// `{app_data_dir}/stockroom`, or `./stockroom-data` when no home is known.
pub fn default_data_dir() -> PathBuf {
    let base = dirs::data_dir().or_else(|| {
        dirs::home_dir().map(|mut h| {
            h.push(".local");
            h.push("share");
            h
        })
    });

    match base {
        Some(mut dir) => {
            dir.push("stockroom");
            dir
        }
        None => PathBuf::from("stockroom-data"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = StorageConfig::from_lookup(lookup(&[]));
        assert_eq!(config.backend, StorageBackend::File);
        assert!(
            config.data_dir.ends_with("stockroom") || config.data_dir.ends_with("stockroom-data")
        );
    }

    #[test]
    fn reads_backend_and_dir() {
        let config = StorageConfig::from_lookup(lookup(&[
            (STORAGE_ENV, " Memory "),
            (DATA_DIR_ENV, "/tmp/inv"),
        ]));
        assert_eq!(config.backend, StorageBackend::Memory);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/inv"));
    }

    #[test]
    fn unknown_backend_falls_back_to_default() {
        let config = StorageConfig::from_lookup(lookup(&[(STORAGE_ENV, "redis")]));
        assert_eq!(config.backend, StorageBackend::File);
    }

    #[test]
    fn backend_parse_roundtrips_display() {
        for backend in [StorageBackend::Memory, StorageBackend::File, StorageBackend::Sqlite] {
            assert_eq!(backend.to_string().parse::<StorageBackend>().unwrap(), backend);
        }
    }

    #[test]
    fn opens_file_store_in_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            backend: StorageBackend::File,
            data_dir: dir.path().join("data"),
        };

        let store = config.open_store().unwrap();
        store.set("inventory", "[]").unwrap();

        assert!(dir.path().join("data").join("inventory.json").exists());
    }

    #[cfg(not(feature = "sqlite"))]
    #[test]
    fn sqlite_without_feature_is_an_error() {
        let config = StorageConfig {
            backend: StorageBackend::Sqlite,
            data_dir: PathBuf::from("unused"),
        };
        assert!(config.open_store().is_err());
    }
}
