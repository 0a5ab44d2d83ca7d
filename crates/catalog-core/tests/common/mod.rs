//! Common test utilities: a recording product store and dispatcher wiring

#![allow(dead_code)]

use catalog_core::{
    CatalogExceptionFactory, DocumentSession, DocumentStore, DomainResult, InMemoryDocumentStore,
    Product, ProductId, ValidatorRegistry, catalog_dispatcher,
    application::Dispatcher,
    infrastructure::adapters::InMemorySession,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Write committed through a [`RecordingStore`]
#[derive(Debug, Clone, PartialEq)]
pub enum Committed {
    Store(ProductId),
    Update(ProductId),
    Delete(ProductId),
}

/// In-memory product store that records every committed write and counts
/// session loads
#[derive(Debug, Clone, Default)]
pub struct RecordingStore {
    inner: InMemoryDocumentStore<Product>,
    log: Arc<Mutex<Vec<Committed>>>,
    loads: Arc<AtomicUsize>,
}

impl RecordingStore {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            inner: InMemoryDocumentStore::with_documents(products),
            log: Arc::default(),
            loads: Arc::default(),
        }
    }

    pub fn committed(&self) -> Vec<Committed> {
        self.log.lock().clone()
    }

    pub fn deletes(&self) -> usize {
        self.log
            .lock()
            .iter()
            .filter(|op| matches!(op, Committed::Delete(_)))
            .count()
    }

    /// Number of `load` calls made through any session
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn get(&self, id: &ProductId) -> Option<Product> {
        self.inner.get(id)
    }
}

impl DocumentStore<Product> for RecordingStore {
    type Session = RecordingSession;

    fn lightweight_session(&self) -> RecordingSession {
        RecordingSession {
            inner: self.inner.lightweight_session(),
            staged: Vec::new(),
            log: self.log.clone(),
            loads: self.loads.clone(),
        }
    }
}

pub struct RecordingSession {
    inner: InMemorySession<Product>,
    staged: Vec<Committed>,
    log: Arc<Mutex<Vec<Committed>>>,
    loads: Arc<AtomicUsize>,
}

impl DocumentSession<Product> for RecordingSession {
    async fn load(&self, id: &ProductId) -> DomainResult<Option<Product>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load(id).await
    }

    async fn query<P>(&self, predicate: P) -> DomainResult<Vec<Product>>
    where
        P: Fn(&Product) -> bool + Send + Sync + 'static,
    {
        self.inner.query(predicate).await
    }

    fn store(&mut self, document: Product) {
        self.staged.push(Committed::Store(document.id));
        self.inner.store(document);
    }

    fn update(&mut self, document: Product) {
        self.staged.push(Committed::Update(document.id));
        self.inner.update(document);
    }

    fn delete(&mut self, id: ProductId) {
        self.staged.push(Committed::Delete(id));
        self.inner.delete(id);
    }

    fn pending(&self) -> usize {
        self.inner.pending()
    }

    async fn save_changes(&mut self) -> DomainResult<()> {
        self.inner.save_changes().await?;
        self.log.lock().append(&mut self.staged);
        Ok(())
    }
}

pub fn product(name: &str, category: &str, price: f64) -> Product {
    Product::new(
        name,
        vec![category.to_string()],
        format!("{name} description"),
        format!("{}.png", name.to_lowercase()),
        price,
    )
}

/// Catalog dispatcher over a recording store
pub fn dispatcher_with(
    store: Arc<RecordingStore>,
    validators: ValidatorRegistry,
) -> Arc<Dispatcher> {
    let dispatcher = catalog_dispatcher(
        store,
        Arc::new(CatalogExceptionFactory),
        Arc::new(validators),
    )
    .expect("catalog wiring has no duplicate handlers");
    Arc::new(dispatcher)
}
