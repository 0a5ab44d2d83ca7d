//! Domain layer view from the application core
//!
//! The entities themselves live in `catalog-domain`; this module adds the
//! ports the core needs from infrastructure.

pub mod ports;

pub use catalog_domain::{DomainError, DomainResult, Product, ProductId};
pub use ports::{Document, DocumentSession, DocumentStore};
