//! Infrastructure layer - storage adapters and the HTTP surface

pub mod adapters;
#[cfg(feature = "http-server")]
pub mod http;

pub use adapters::*;
