//! Audit trail records derived from inventory events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};

use stockroom_core::AuditEntryId;

use crate::list::InventoryEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Add,
    Update,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Add => "add",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
        }
    }
}

impl core::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One recorded mutation.
///
/// `details` holds the item snapshot; updates carry `{"old": .., "new": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub action: AuditAction,
    pub sku: String,
    pub timestamp: DateTime<Utc>,
    pub details: JsonValue,
}

impl AuditEntry {
    pub fn from_event(event: &InventoryEvent, timestamp: DateTime<Utc>) -> Self {
        let (action, sku, details) = match event {
            InventoryEvent::ItemAdded(e) => {
                (AuditAction::Add, e.item.sku.clone(), json!(e.item))
            }
            InventoryEvent::ItemReplaced(e) => (
                AuditAction::Update,
                // Recorded under the SKU the item had before the edit.
                e.previous.sku.clone(),
                json!({ "old": e.previous, "new": e.item }),
            ),
            InventoryEvent::ItemRemoved(e) => {
                (AuditAction::Delete, e.item.sku.clone(), json!(e.item))
            }
        };

        Self {
            id: AuditEntryId::new(),
            action,
            sku,
            timestamp,
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::InventoryItem;
    use crate::list::{ItemAdded, ItemReplaced};

    fn item(sku: &str, name: &str) -> InventoryItem {
        InventoryItem {
            product_name: name.to_string(),
            sku: sku.to_string(),
            category: "Hardware".to_string(),
            quantity: 1,
            supplier: "Acme".to_string(),
            price: 2.5,
            location: "B2".to_string(),
        }
    }

    #[test]
    fn add_entry_snapshots_item() {
        let event = InventoryEvent::ItemAdded(ItemAdded {
            position: 0,
            item: item("W1", "Widget"),
        });
        let entry = AuditEntry::from_event(&event, Utc::now());

        assert_eq!(entry.action, AuditAction::Add);
        assert_eq!(entry.sku, "W1");
        assert_eq!(entry.details["productName"], "Widget");
    }

    #[test]
    fn update_entry_carries_old_and_new() {
        let event = InventoryEvent::ItemReplaced(ItemReplaced {
            position: 3,
            previous: item("W1", "Widget"),
            item: item("W2", "Widget XL"),
        });
        let entry = AuditEntry::from_event(&event, Utc::now());

        assert_eq!(entry.action, AuditAction::Update);
        assert_eq!(entry.sku, "W1");
        assert_eq!(entry.details["old"]["productName"], "Widget");
        assert_eq!(entry.details["new"]["sku"], "W2");
    }

    #[test]
    fn action_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&AuditAction::Delete).unwrap(), "\"delete\"");
    }
}
