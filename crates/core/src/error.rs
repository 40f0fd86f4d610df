//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, user-facing failures (malformed input,
/// key collisions, stale positions). Storage failures belong to the infra layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A form value failed to parse (e.g. non-numeric quantity).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An item with the same SKU already exists.
    #[error("duplicate SKU: {0} already exists")]
    DuplicateSku(String),

    /// A position does not reference an existing item.
    #[error("no item at position {position} (inventory has {len} items)")]
    PositionOutOfRange { position: usize, len: usize },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn duplicate_sku(sku: impl Into<String>) -> Self {
        Self::DuplicateSku(sku.into())
    }

    pub fn out_of_range(position: usize, len: usize) -> Self {
        Self::PositionOutOfRange { position, len }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_user_readable() {
        assert_eq!(
            DomainError::duplicate_sku("W1").to_string(),
            "duplicate SKU: W1 already exists"
        );
        assert_eq!(
            DomainError::out_of_range(3, 2).to_string(),
            "no item at position 3 (inventory has 2 items)"
        );
    }
}
