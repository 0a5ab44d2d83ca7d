//! Infrastructure adapters implementing domain ports

pub mod document_store;
pub mod generic_store;

pub use document_store::{InMemoryDocumentStore, InMemorySession};
pub use generic_store::InMemoryStore;

/// Product store used by the server binary
pub type ProductStore = InMemoryDocumentStore<catalog_domain::Product>;
