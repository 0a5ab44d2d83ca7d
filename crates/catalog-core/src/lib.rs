//! # Catalog Core
//!
//! Request pipeline for the product catalog: a type-keyed dispatcher that
//! threads every request through logging and validation stages before its
//! handler, orchestrators composed from nested dispatches, a failure taxonomy,
//! and an axum adapter that translates failures into problem envelopes.

#![warn(rust_2018_idioms)]

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Pipeline exports
pub use application::{
    CatalogExceptionFactory, ConfigurationError, DispatchContext, Dispatcher, DispatcherBuilder,
    ExceptionFactory, LoggingStage, Next, PipelineStage, ProductKey, Request, RequestEnvelope,
    RequestHandler, ResponseEnvelope, ValidationFailure, ValidationStage, Validator,
    ValidatorRegistry, catalog_dispatcher, catalog_validators,
};

// Domain exports
pub use catalog_domain::{DomainError, DomainResult, Product, ProductId};
pub use domain::ports::{Document, DocumentSession, DocumentStore};

pub use config::{CatalogConfig, ConfigError, Environment};
pub use error::{CatalogError, CatalogResult, ExceptionInfo, ValidationErrors};
pub use infrastructure::adapters::{InMemoryDocumentStore, ProductStore};

#[cfg(feature = "http-server")]
pub use infrastructure::http::{CatalogAppState, ExceptionTranslator, create_catalog_router};

/// Re-export commonly used types
pub mod prelude {
    pub use super::{
        CatalogError, CatalogResult, DispatchContext, Dispatcher, DocumentSession, DocumentStore,
        Product, ProductId, Request, RequestHandler, ValidationFailure, Validator,
        ValidatorRegistry,
    };
}
