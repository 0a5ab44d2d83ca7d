//! Command handlers: writes through a lightweight session

use std::sync::Arc;

use tracing::info;

use crate::{
    application::{
        commands::*,
        dispatcher::{DispatchContext, RequestHandler},
    },
    domain::ports::{DocumentSession, DocumentStore},
    error::CatalogResult,
};
use catalog_domain::Product;

/// Handler for product create, update and delete commands.
///
/// Mutations stage one write and commit it. Existence is checked by the
/// orchestrators before these commands are sent; a direct update of a missing
/// product is rejected by the session commit.
pub struct ProductCommandHandler<S>
where
    S: DocumentStore<Product>,
{
    store: Arc<S>,
}

impl<S> ProductCommandHandler<S>
where
    S: DocumentStore<Product>,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S> RequestHandler<CreateProductCommand> for ProductCommandHandler<S>
where
    S: DocumentStore<Product>,
{
    async fn handle(
        &self,
        command: CreateProductCommand,
        ctx: &DispatchContext<'_>,
    ) -> CatalogResult<CreateProductResult> {
        let product = Product::new(
            command.name,
            command.category,
            command.description,
            command.image_file,
            command.price,
        );
        let id = product.id;

        let mut session = self.store.lightweight_session();
        session.store(product);
        ctx.ensure_active()?;
        session.save_changes().await?;

        info!(product_id = %id, "Product created");
        Ok(CreateProductResult { id })
    }
}

impl<S> RequestHandler<UpdateProductCommand> for ProductCommandHandler<S>
where
    S: DocumentStore<Product>,
{
    async fn handle(
        &self,
        command: UpdateProductCommand,
        ctx: &DispatchContext<'_>,
    ) -> CatalogResult<UpdateProductResult> {
        let id = command.product.id;
        let mut session = self.store.lightweight_session();
        session.update(command.product);
        ctx.ensure_active()?;
        session.save_changes().await?;

        info!(product_id = %id, "Product updated");
        Ok(UpdateProductResult { is_success: true })
    }
}

impl<S> RequestHandler<DeleteProductCommand> for ProductCommandHandler<S>
where
    S: DocumentStore<Product>,
{
    async fn handle(
        &self,
        command: DeleteProductCommand,
        ctx: &DispatchContext<'_>,
    ) -> CatalogResult<bool> {
        let mut session = self.store.lightweight_session();
        session.delete(command.id);
        ctx.ensure_active()?;
        session.save_changes().await?;

        info!(product_id = %command.id, "Product deleted");
        Ok(true)
    }
}

impl<S> std::fmt::Debug for ProductCommandHandler<S>
where
    S: DocumentStore<Product>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductCommandHandler").finish_non_exhaustive()
    }
}
