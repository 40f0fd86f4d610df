//! `stockroom-core`: shared domain primitives.
//!
//! This crate contains **pure domain** building blocks (no IO, no storage).

pub mod aggregate;
pub mod error;
pub mod id;

pub use aggregate::Aggregate;
pub use error::{DomainError, DomainResult};
pub use id::{AuditEntryId, SessionId};
