//! Key-value persistence boundary.
//!
//! The inventory store only needs "get/set a string blob by key"; this module
//! defines that facility and its backends without making storage assumptions
//! anywhere above it.

pub mod file;
pub mod in_memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod r#trait;

pub use file::FileKeyValueStore;
pub use in_memory::InMemoryKeyValueStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteKeyValueStore;
pub use r#trait::{KeyValueStore, StorageError, validate_key};
