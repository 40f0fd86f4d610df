//! Infrastructure layer: persistence backends, the write-through inventory
//! store, and configuration.

pub mod config;
pub mod inventory_store;
pub mod kv_store;

pub use config::{StorageBackend, StorageConfig};
pub use inventory_store::{
    AUDIT_KEY, DELETED_KEY, INVENTORY_KEY, InventoryStore, StoreError, UNREADABLE_KEY,
};
pub use kv_store::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, StorageError};
