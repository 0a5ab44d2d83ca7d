//! Orchestrators: existence check, then mutation
//!
//! Both steps go back through the dispatcher, so each nested request passes
//! the full pipeline. The get-by-id handler raises the not-found failure;
//! orchestrators never translate or catch it.

use tracing::debug;

use crate::{
    application::{
        commands::{
            DeleteProductCommand, DeleteProductOrchestratorCommand, UpdateProductCommand,
            UpdateProductOrchestratorCommand,
        },
        dispatcher::{DispatchContext, RequestHandler},
        queries::GetProductByIdQuery,
    },
    error::CatalogResult,
};

/// Handler for the update and delete orchestrator commands.
///
/// Holds no storage; everything it does is a nested dispatch.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProductOrchestrator;

impl ProductOrchestrator {
    pub fn new() -> Self {
        Self
    }
}

impl RequestHandler<UpdateProductOrchestratorCommand> for ProductOrchestrator {
    async fn handle(
        &self,
        command: UpdateProductOrchestratorCommand,
        ctx: &DispatchContext<'_>,
    ) -> CatalogResult<bool> {
        let id = command.product.id;

        ctx.send(GetProductByIdQuery { id }).await?;
        debug!(product_id = %id, "Product exists, dispatching update");

        ctx.send(UpdateProductCommand {
            product: command.product,
        })
        .await?;

        Ok(true)
    }
}

impl RequestHandler<DeleteProductOrchestratorCommand> for ProductOrchestrator {
    async fn handle(
        &self,
        command: DeleteProductOrchestratorCommand,
        ctx: &DispatchContext<'_>,
    ) -> CatalogResult<bool> {
        let id = command.id;

        ctx.send(GetProductByIdQuery { id }).await?;
        debug!(product_id = %id, "Product exists, dispatching delete");

        ctx.send(DeleteProductCommand { id }).await
    }
}
