//! Request handlers for the product catalog
//!
//! Command and query handlers own storage access; orchestrators only
//! sequence other requests through the dispatcher.

pub mod command_handlers;
pub mod orchestrators;
pub mod query_handlers;

pub use command_handlers::ProductCommandHandler;
pub use orchestrators::ProductOrchestrator;
pub use query_handlers::ProductQueryHandler;
