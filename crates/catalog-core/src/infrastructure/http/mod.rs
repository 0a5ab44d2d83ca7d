//! HTTP transport implementations

pub mod axum_adapter;
pub mod middleware;
pub mod problem;

pub use axum_adapter::{API_PREFIX, CatalogAppState, create_catalog_router};
pub use middleware::{PanicResponder, exception_translation};
pub use problem::{ExceptionTranslator, ProblemDetails, UnhandledError};
