use serde::{Deserialize, Serialize};

use stockroom_core::{Aggregate, DomainError};

use crate::item::InventoryItem;

/// Ordered, position-addressed sequence of inventory items.
///
/// Insertion order is display order. A record's 0-based position is its only
/// identity, so positions are only meaningful against the current state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryList {
    items: Vec<InventoryItem>,
}

impl InventoryList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<InventoryItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&InventoryItem> {
        self.items.get(position)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, InventoryItem> {
        self.items.iter()
    }

    pub fn contains_sku(&self, sku: &str) -> bool {
        self.items.iter().any(|item| item.has_sku(sku))
    }

    /// Decode the persisted blob (a JSON array of items).
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Encode the full sequence as the persisted blob.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    fn ensure_position(&self, position: usize) -> Result<&InventoryItem, DomainError> {
        self.items
            .get(position)
            .ok_or_else(|| DomainError::out_of_range(position, self.items.len()))
    }

    fn handle_add(&self, item: &InventoryItem) -> Result<InventoryEvent, DomainError> {
        if self.contains_sku(&item.sku) {
            return Err(DomainError::duplicate_sku(item.sku.clone()));
        }
        Ok(InventoryEvent::ItemAdded(ItemAdded {
            position: self.items.len(),
            item: item.clone(),
        }))
    }

    fn handle_replace(
        &self,
        position: usize,
        item: &InventoryItem,
    ) -> Result<InventoryEvent, DomainError> {
        // Edits never re-check SKU uniqueness.
        let previous = self.ensure_position(position)?;
        Ok(InventoryEvent::ItemReplaced(ItemReplaced {
            position,
            previous: previous.clone(),
            item: item.clone(),
        }))
    }

    fn handle_remove(&self, position: usize) -> Result<InventoryEvent, DomainError> {
        let item = self.ensure_position(position)?;
        Ok(InventoryEvent::ItemRemoved(ItemRemoved {
            position,
            item: item.clone(),
        }))
    }
}

impl<'a> IntoIterator for &'a InventoryList {
    type Item = &'a InventoryItem;
    type IntoIter = core::slice::Iter<'a, InventoryItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Commands accepted by the inventory list.
#[derive(Debug, Clone, PartialEq)]
pub enum InventoryCommand {
    Add(InventoryItem),
    ReplaceAt { position: usize, item: InventoryItem },
    RemoveAt { position: usize },
}

/// Event: ItemAdded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub position: usize,
    pub item: InventoryItem,
}

/// Event: ItemReplaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemReplaced {
    pub position: usize,
    pub previous: InventoryItem,
    pub item: InventoryItem,
}

/// Event: ItemRemoved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRemoved {
    pub position: usize,
    pub item: InventoryItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InventoryEvent {
    ItemAdded(ItemAdded),
    ItemReplaced(ItemReplaced),
    ItemRemoved(ItemRemoved),
}

impl InventoryEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::ItemAdded(_) => "inventory.item.added",
            InventoryEvent::ItemReplaced(_) => "inventory.item.replaced",
            InventoryEvent::ItemRemoved(_) => "inventory.item.removed",
        }
    }

    pub fn position(&self) -> usize {
        match self {
            InventoryEvent::ItemAdded(e) => e.position,
            InventoryEvent::ItemReplaced(e) => e.position,
            InventoryEvent::ItemRemoved(e) => e.position,
        }
    }

    /// The item as it stands after the event (the removed item for removals).
    pub fn item(&self) -> &InventoryItem {
        match self {
            InventoryEvent::ItemAdded(e) => &e.item,
            InventoryEvent::ItemReplaced(e) => &e.item,
            InventoryEvent::ItemRemoved(e) => &e.item,
        }
    }
}

impl Aggregate for InventoryList {
    type Command = InventoryCommand;
    type Event = InventoryEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InventoryEvent::ItemAdded(e) => {
                self.items.push(e.item.clone());
            }
            InventoryEvent::ItemReplaced(e) => {
                if let Some(slot) = self.items.get_mut(e.position) {
                    *slot = e.item.clone();
                }
            }
            InventoryEvent::ItemRemoved(e) => {
                if e.position < self.items.len() {
                    self.items.remove(e.position);
                }
            }
        }
    }

    fn handle(&self, command: &Self::Command) -> Result<Self::Event, Self::Error> {
        match command {
            InventoryCommand::Add(item) => self.handle_add(item),
            InventoryCommand::ReplaceAt { position, item } => self.handle_replace(*position, item),
            InventoryCommand::RemoveAt { position } => self.handle_remove(*position),
        }
    }
}
