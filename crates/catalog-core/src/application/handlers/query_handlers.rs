//! Query handlers: read-only session access

use std::sync::Arc;

use tracing::debug;

use crate::{
    application::{
        dispatcher::{DispatchContext, RequestHandler},
        exceptions::{ExceptionFactory, ProductKey},
        queries::*,
    },
    domain::ports::{DocumentSession, DocumentStore},
    error::CatalogResult,
};
use catalog_domain::Product;

/// Handler for product queries
pub struct ProductQueryHandler<S>
where
    S: DocumentStore<Product>,
{
    store: Arc<S>,
    exceptions: Arc<dyn ExceptionFactory>,
}

impl<S> ProductQueryHandler<S>
where
    S: DocumentStore<Product>,
{
    pub fn new(store: Arc<S>, exceptions: Arc<dyn ExceptionFactory>) -> Self {
        Self { store, exceptions }
    }
}

impl<S> RequestHandler<GetProductsQuery> for ProductQueryHandler<S>
where
    S: DocumentStore<Product>,
{
    async fn handle(
        &self,
        _query: GetProductsQuery,
        _ctx: &DispatchContext<'_>,
    ) -> CatalogResult<GetProductsResult> {
        let products = self.store.lightweight_session().query(|_| true).await?;
        debug!(count = products.len(), "Products loaded");
        Ok(GetProductsResult { products })
    }
}

impl<S> RequestHandler<GetProductByIdQuery> for ProductQueryHandler<S>
where
    S: DocumentStore<Product>,
{
    async fn handle(
        &self,
        query: GetProductByIdQuery,
        _ctx: &DispatchContext<'_>,
    ) -> CatalogResult<GetProductByIdResult> {
        let session = self.store.lightweight_session();
        match session.load(&query.id).await? {
            Some(product) => Ok(GetProductByIdResult { product }),
            None => Err(self
                .exceptions
                .product_not_found(&ProductKey::Id(query.id))),
        }
    }
}

impl<S> RequestHandler<GetProductsByCategoryQuery> for ProductQueryHandler<S>
where
    S: DocumentStore<Product>,
{
    async fn handle(
        &self,
        query: GetProductsByCategoryQuery,
        _ctx: &DispatchContext<'_>,
    ) -> CatalogResult<GetProductsByCategoryResult> {
        let category = query.category;
        let products = self
            .store
            .lightweight_session()
            .query(move |product: &Product| product.in_category(&category))
            .await?;
        Ok(GetProductsByCategoryResult { products })
    }
}

impl<S> std::fmt::Debug for ProductQueryHandler<S>
where
    S: DocumentStore<Product>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductQueryHandler").finish_non_exhaustive()
    }
}
