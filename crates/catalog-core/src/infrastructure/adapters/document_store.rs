//! In-memory document store with lightweight sessions

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::generic_store::InMemoryStore;
use crate::domain::ports::{Document, DocumentSession, DocumentStore};
use catalog_domain::{DomainError, DomainResult};

/// Document store keeping one collection in a shared `InMemoryStore`.
///
/// Session commits are serialized by a store-wide lock so that verifying a
/// session's staged operations and applying them cannot interleave with
/// another commit.
#[derive(Debug, Clone)]
pub struct InMemoryDocumentStore<D: Document> {
    documents: InMemoryStore<D::Id, D>,
    commit: Arc<Mutex<()>>,
}

impl<D: Document> InMemoryDocumentStore<D> {
    pub fn new() -> Self {
        Self {
            documents: InMemoryStore::new(),
            commit: Arc::default(),
        }
    }

    /// Store pre-populated with `documents`, keyed by their own ids
    pub fn with_documents(documents: impl IntoIterator<Item = D>) -> Self {
        let store = Self::new();
        for document in documents {
            store.documents.insert(document.id(), document);
        }
        store
    }

    /// Number of committed documents
    pub fn count(&self) -> usize {
        self.documents.count()
    }

    /// Read a committed document outside of any session
    pub fn get(&self, id: &D::Id) -> Option<D> {
        self.documents.get(id)
    }
}

impl<D: Document> Default for InMemoryDocumentStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Document> DocumentStore<D> for InMemoryDocumentStore<D> {
    type Session = InMemorySession<D>;

    fn lightweight_session(&self) -> InMemorySession<D> {
        InMemorySession {
            documents: self.documents.clone(),
            commit: self.commit.clone(),
            staged: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
enum Staged<D: Document> {
    Store(D),
    Update(D),
    Delete(D::Id),
}

/// Session over an [`InMemoryDocumentStore`].
///
/// Dropping a session discards whatever it staged.
#[derive(Debug)]
pub struct InMemorySession<D: Document> {
    documents: InMemoryStore<D::Id, D>,
    commit: Arc<Mutex<()>>,
    staged: Vec<Staged<D>>,
}

impl<D: Document> InMemorySession<D> {
    /// Check staged updates against committed state plus earlier staged ops
    fn verify(&self) -> DomainResult<()> {
        let mut overlay: HashMap<&D::Id, bool> = HashMap::new();
        let mut ids = Vec::with_capacity(self.staged.len());
        for op in &self.staged {
            ids.push(match op {
                Staged::Store(document) | Staged::Update(document) => document.id(),
                Staged::Delete(id) => id.clone(),
            });
        }

        for (op, id) in self.staged.iter().zip(&ids) {
            match op {
                Staged::Store(_) => {
                    overlay.insert(id, true);
                }
                Staged::Delete(_) => {
                    overlay.insert(id, false);
                }
                Staged::Update(_) => {
                    let exists = overlay
                        .get(id)
                        .copied()
                        .unwrap_or_else(|| self.documents.contains_key(id));
                    if !exists {
                        return Err(DomainError::not_found(D::COLLECTION, id));
                    }
                }
            }
        }

        Ok(())
    }
}

impl<D: Document> DocumentSession<D> for InMemorySession<D> {
    async fn load(&self, id: &D::Id) -> DomainResult<Option<D>> {
        Ok(self.documents.get(id))
    }

    async fn query<P>(&self, predicate: P) -> DomainResult<Vec<D>>
    where
        P: Fn(&D) -> bool + Send + Sync + 'static,
    {
        Ok(self.documents.filter(predicate))
    }

    fn store(&mut self, document: D) {
        self.staged.push(Staged::Store(document));
    }

    fn update(&mut self, document: D) {
        self.staged.push(Staged::Update(document));
    }

    fn delete(&mut self, id: D::Id) {
        self.staged.push(Staged::Delete(id));
    }

    fn pending(&self) -> usize {
        self.staged.len()
    }

    async fn save_changes(&mut self) -> DomainResult<()> {
        if self.staged.is_empty() {
            return Ok(());
        }

        // Held until every staged operation is applied; no await below.
        let _commit = self.commit.lock();
        self.verify()?;

        let committed = self.staged.len();
        for op in self.staged.drain(..) {
            match op {
                Staged::Store(document) => {
                    self.documents.insert(document.id(), document);
                }
                Staged::Update(document) => {
                    let id = document.id();
                    if !self.documents.replace(&id, document) {
                        return Err(DomainError::not_found(D::COLLECTION, id));
                    }
                }
                Staged::Delete(id) => {
                    self.documents.remove(&id);
                }
            }
        }

        debug!(collection = D::COLLECTION, operations = committed, "Session changes saved");
        Ok(())
    }
}
