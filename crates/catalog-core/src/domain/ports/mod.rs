//! Ports - storage interfaces the application core depends on
//!
//! Handlers open a short-lived [`DocumentSession`] per request, read through
//! it, stage their writes, and commit them with
//! [`DocumentSession::save_changes`]. Adapters decide how staging and commit
//! are realized.

use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;

use catalog_domain::{DomainResult, Product, ProductId};

/// A record persisted as a whole under its own key
pub trait Document: Clone + std::fmt::Debug + Send + Sync + 'static {
    /// Key type
    type Id: Eq + Hash + Clone + Display + std::fmt::Debug + Send + Sync + 'static;

    /// Collection name used in diagnostics
    const COLLECTION: &'static str;

    fn id(&self) -> Self::Id;
}

impl Document for Product {
    type Id = ProductId;

    const COLLECTION: &'static str = "products";

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Factory for document sessions
pub trait DocumentStore<D: Document>: Send + Sync + 'static {
    type Session: DocumentSession<D>;

    /// Open a session without identity map or change tracking
    fn lightweight_session(&self) -> Self::Session;
}

/// Unit of work over one document collection.
///
/// Reads see committed state only. `store`, `update` and `delete` are staged
/// and take effect together when `save_changes` succeeds; a failed commit
/// applies nothing.
///
/// Async operations return named futures so generic handlers can hold a
/// session across `.await` without boxing; implementations write `async fn`.
pub trait DocumentSession<D: Document>: Send + Sync {
    fn load(&self, id: &D::Id) -> impl Future<Output = DomainResult<Option<D>>> + Send;

    /// All committed documents matching `predicate`
    fn query<P>(&self, predicate: P) -> impl Future<Output = DomainResult<Vec<D>>> + Send
    where
        P: Fn(&D) -> bool + Send + Sync + 'static;

    /// Stage an insert, replacing any document with the same id
    fn store(&mut self, document: D);

    /// Stage a replacement of an existing document
    fn update(&mut self, document: D);

    /// Stage a delete; deleting an absent id is a no-op
    fn delete(&mut self, id: D::Id);

    /// Number of staged operations not yet committed
    fn pending(&self) -> usize;

    /// Commit staged operations.
    ///
    /// Fails with [`DomainError::NotFound`](catalog_domain::DomainError::NotFound)
    /// when a staged update targets a missing document.
    fn save_changes(&mut self) -> impl Future<Output = DomainResult<()>> + Send;
}
