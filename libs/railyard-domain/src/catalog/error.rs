//! Domain errors for catalog operations
//!
//! This module defines all possible failure outcomes of the write pipeline.
//! These are domain-level errors that abstract away infrastructure details:
//! no database driver or HTTP types appear here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::ids::ComponentId;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Name of the offending field
    pub field: String,
    /// Human-readable reason
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors that can occur in the catalog write pipeline
///
/// Business failures (`NotFound`, `Conflict`, `Validation`) propagate
/// untouched to the transport layer. `TransientStorage` is the only retryable
/// class: the transactional executor re-runs the whole unit of work on it
/// until its retry budget is exhausted.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The referenced id does not resolve to an existing component
    #[error("component {0} not found")]
    NotFound(ComponentId),

    /// A unique number collided with an existing component
    #[error("unique number '{0}' is already in use")]
    Conflict(String),

    /// The input failed one or more field-level rules
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    /// Connection loss, deadlock, timeout - expected to succeed if retried
    #[error("transient storage failure: {0}")]
    TransientStorage(String),

    /// A non-transient storage failure
    #[error("storage failure: {0}")]
    Storage(String),

    /// An invariant breach inside the pipeline itself
    #[error("internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// Create a conflict error for a duplicate unique number
    pub fn conflict(unique_number: impl Into<String>) -> Self {
        Self::Conflict(unique_number.into())
    }

    /// Create a transient storage error with a message
    pub fn transient(msg: impl Into<String>) -> Self {
        Self::TransientStorage(msg.into())
    }

    /// Create a storage error with a message
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an internal error with a message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the transactional executor may retry the unit of work
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientStorage(_))
    }
}

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = CatalogError::NotFound(ComponentId::new(9999));
        assert_eq!(err.to_string(), "component 9999 not found");
    }

    #[test]
    fn test_conflict_display() {
        let err = CatalogError::conflict("ENG123");
        assert_eq!(err.to_string(), "unique number 'ENG123' is already in use");
        assert!(!err.is_transient());
    }

    #[test]
    fn test_only_transient_storage_is_retryable() {
        assert!(CatalogError::transient("connection reset").is_transient());
        assert!(!CatalogError::storage("disk full").is_transient());
        assert!(!CatalogError::NotFound(ComponentId::new(1)).is_transient());
        assert!(!CatalogError::Validation(vec![]).is_transient());
        assert!(!CatalogError::internal("oops").is_transient());
    }

    #[test]
    fn test_validation_display_counts_violations() {
        let err = CatalogError::Validation(vec![
            FieldViolation::new("name", "name is required"),
            FieldViolation::new("quantity", "quantity cannot be assigned"),
        ]);
        assert_eq!(err.to_string(), "validation failed on 2 field(s)");
    }
}
