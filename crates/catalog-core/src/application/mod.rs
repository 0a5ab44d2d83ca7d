//! Application layer - request pipeline and catalog use cases
//!
//! Requests travel through [`Dispatcher`] and its ordered stages before
//! reaching exactly one handler. Handlers may dispatch further requests
//! through their [`DispatchContext`].

pub mod commands;
pub mod dispatcher;
pub mod exceptions;
pub mod handlers;
pub mod pipeline;
pub mod queries;
pub mod request;
pub mod validation;
pub mod validators;

pub use commands::*;
pub use dispatcher::{
    ConfigurationError, DispatchContext, Dispatcher, DispatcherBuilder, ErasedHandler,
    RequestHandler,
};
pub use exceptions::{CatalogExceptionFactory, ExceptionFactory, ProductKey};
pub use pipeline::{LoggingStage, Next, PipelineStage, ValidationStage};
pub use queries::*;
pub use request::{Request, RequestEnvelope, ResponseEnvelope};
pub use validation::{ValidationFailure, Validator, ValidatorRegistry};
pub use validators::catalog_validators;

use std::sync::Arc;

use crate::domain::ports::DocumentStore;
use catalog_domain::Product;
use handlers::{ProductCommandHandler, ProductOrchestrator, ProductQueryHandler};

/// Wire every catalog request to its handler behind the logging and
/// validation stages
pub fn catalog_dispatcher<S>(
    store: Arc<S>,
    exceptions: Arc<dyn ExceptionFactory>,
    validators: Arc<ValidatorRegistry>,
) -> Result<Dispatcher, ConfigurationError>
where
    S: DocumentStore<Product>,
{
    let commands = Arc::new(ProductCommandHandler::new(store.clone()));
    let queries = Arc::new(ProductQueryHandler::new(store, exceptions));

    Dispatcher::builder()
        .stage(LoggingStage::new())
        .stage(ValidationStage::new(validators))
        .register::<CreateProductCommand, _>(commands.clone())
        .register::<UpdateProductCommand, _>(commands.clone())
        .register::<DeleteProductCommand, _>(commands)
        .register::<GetProductsQuery, _>(queries.clone())
        .register::<GetProductByIdQuery, _>(queries.clone())
        .register::<GetProductsByCategoryQuery, _>(queries)
        .register::<UpdateProductOrchestratorCommand, _>(ProductOrchestrator::new())
        .register::<DeleteProductOrchestratorCommand, _>(ProductOrchestrator::new())
        .build()
}
