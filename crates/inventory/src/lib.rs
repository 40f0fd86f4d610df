//! Inventory domain module.
//!
//! This crate contains the business rules for the inventory list, implemented
//! purely as deterministic domain logic (no IO, no storage, no rendering).

pub mod audit;
pub mod form;
pub mod item;
pub mod list;

pub use audit::{AuditAction, AuditEntry};
pub use form::{FormField, ItemForm};
pub use item::InventoryItem;
pub use list::{
    InventoryCommand, InventoryEvent, InventoryList, ItemAdded, ItemRemoved, ItemReplaced,
};
