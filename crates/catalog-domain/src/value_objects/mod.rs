//! Domain Value Objects
//!
//! Immutable objects that represent concepts in the domain
//! with no conceptual identity, only defined by their attributes.

mod id;

pub use id::{Id, IdMarker, ProductId, ProductMarker};
