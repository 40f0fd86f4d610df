//! Write-through inventory store.
//!
//! The store owns the in-memory [`InventoryList`] and mirrors it to a
//! [`KeyValueStore`] after every mutation. A mutation is decided by the
//! aggregate, persisted as a full snapshot, and only then committed in memory,
//! so memory and storage never diverge.

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use stockroom_core::{Aggregate, DomainError};
use stockroom_inventory::{
    AuditEntry, InventoryCommand, InventoryEvent, InventoryItem, InventoryList,
};

use crate::kv_store::{KeyValueStore, StorageError};

/// Key of the inventory blob (JSON array of items).
pub const INVENTORY_KEY: &str = "inventory";
/// Key of the audit trail blob (JSON array of audit entries).
pub const AUDIT_KEY: &str = "inventory.audit";
/// Key of the deleted-items archive (JSON array of items).
pub const DELETED_KEY: &str = "inventory.deleted";
/// Key holding the last inventory blob that failed to parse, verbatim.
pub const UNREADABLE_KEY: &str = "inventory.unreadable";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("failed to persist inventory: {0}")]
    Storage(#[from] StorageError),

    #[error("failed to encode inventory: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            StoreError::Domain(err) => Some(err),
            _ => None,
        }
    }
}

/// Single source of truth for the ordered item sequence.
#[derive(Debug)]
pub struct InventoryStore<S> {
    kv: S,
    list: InventoryList,
}

impl<S> InventoryStore<S>
where
    S: KeyValueStore,
{
    /// Restore the inventory from storage.
    ///
    /// An absent or unparsable blob yields an empty inventory. An unparsable
    /// blob is first copied verbatim to [`UNREADABLE_KEY`], since the next
    /// mutation overwrites [`INVENTORY_KEY`]. Only a failing persistence
    /// facility is reported.
    pub fn load(kv: S) -> Result<Self, StorageError> {
        let list = match kv.get(INVENTORY_KEY)? {
            None => {
                tracing::debug!("no persisted inventory; starting empty");
                InventoryList::new()
            }
            Some(raw) => match InventoryList::from_json(&raw) {
                Ok(list) => {
                    tracing::info!(items = list.len(), "inventory loaded");
                    list
                }
                Err(err) => {
                    kv.set(UNREADABLE_KEY, &raw)?;
                    tracing::warn!(
                        error = %err,
                        backup_key = UNREADABLE_KEY,
                        "persisted inventory is unreadable; kept a copy and starting empty"
                    );
                    InventoryList::new()
                }
            },
        };

        Ok(Self { kv, list })
    }

    pub fn list(&self) -> &InventoryList {
        &self.list
    }

    pub fn items(&self) -> &[InventoryItem] {
        self.list.items()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&InventoryItem> {
        self.list.get(position)
    }

    /// Append a new item; its SKU must not already exist.
    ///
    /// Returns the position the item landed at.
    pub fn add(&mut self, item: InventoryItem) -> Result<usize, StoreError> {
        let event = self.execute(InventoryCommand::Add(item))?;
        Ok(event.position())
    }

    /// Replace the item at `position` in place. SKU uniqueness is not checked.
    pub fn replace_at(&mut self, position: usize, item: InventoryItem) -> Result<(), StoreError> {
        self.execute(InventoryCommand::ReplaceAt { position, item })?;
        Ok(())
    }

    /// Remove the item at `position`; later items shift down by one.
    ///
    /// Returns the removed item.
    pub fn remove_at(&mut self, position: usize) -> Result<InventoryItem, StoreError> {
        let event = self.execute(InventoryCommand::RemoveAt { position })?;
        Ok(event.item().clone())
    }

    /// Recorded mutations, oldest first.
    pub fn audit_trail(&self) -> Result<Vec<AuditEntry>, StorageError> {
        self.read_array(AUDIT_KEY)
    }

    /// Items removed so far, oldest first.
    pub fn deleted_items(&self) -> Result<Vec<InventoryItem>, StorageError> {
        self.read_array(DELETED_KEY)
    }

    fn execute(&mut self, command: InventoryCommand) -> Result<InventoryEvent, StoreError> {
        let event = self.list.handle(&command)?;

        let mut next = self.list.clone();
        next.apply(&event);

        // Durable step first: memory only changes once the snapshot is stored.
        let blob = next.to_json()?;
        self.kv.set(INVENTORY_KEY, &blob)?;
        self.list = next;

        tracing::info!(
            event = event.event_type(),
            position = event.position(),
            sku = %event.item().sku,
            items = self.list.len(),
            "inventory updated"
        );

        self.record(&event);
        Ok(event)
    }

    /// Append the audit entry (and archive removed items).
    ///
    /// These are secondary records: failures are logged and never undo the
    /// committed mutation.
    fn record(&self, event: &InventoryEvent) {
        let entry = AuditEntry::from_event(event, Utc::now());
        if let Err(err) = self.append(AUDIT_KEY, entry) {
            tracing::warn!(error = %err, "failed to record audit entry");
        }

        if let InventoryEvent::ItemRemoved(e) = event {
            if let Err(err) = self.append(DELETED_KEY, e.item.clone()) {
                tracing::warn!(
                    error = %err,
                    sku = %e.item.sku,
                    "failed to archive deleted item"
                );
            }
        }
    }

    fn append<T>(&self, key: &str, value: T) -> Result<(), StoreError>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut values: Vec<T> = self.read_array(key)?;
        values.push(value);
        let blob = serde_json::to_string(&values)?;
        self.kv.set(key, &blob)?;
        Ok(())
    }

    fn read_array<T>(&self, key: &str) -> Result<Vec<T>, StorageError>
    where
        T: DeserializeOwned,
    {
        let Some(raw) = self.kv.get(key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(values) => Ok(values),
            Err(err) => {
                tracing::warn!(
                    key,
                    error = %err,
                    "persisted records are unreadable; treating as empty"
                );
                Ok(Vec::new())
            }
        }
    }
}
