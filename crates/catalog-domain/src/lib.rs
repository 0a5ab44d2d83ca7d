//! Catalog Domain Layer - Pure Business Types
//!
//! This crate holds the product catalog's domain types with no knowledge of
//! dispatching, storage backends or HTTP.
//!
//! ## Architecture
//!
//! - **Value Objects**: Immutable, validated domain concepts (`ProductId`)
//! - **Entities**: Domain objects with identity (`Product`)

#![warn(missing_docs)]

pub mod entities;
pub mod value_objects;

// Re-export core types
pub use entities::Product;
pub use value_objects::{Id, IdMarker, ProductId, ProductMarker};

/// Domain Result type
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-specific errors
///
/// Raised by entities and by storage adapters implementing the domain ports.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DomainError {
    /// Document addressed by key does not exist
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Concurrency conflict detected by the storage backend
    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Create a not-found error for a document in a named collection
    pub fn not_found(collection: &str, key: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{collection}/{key}"))
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
