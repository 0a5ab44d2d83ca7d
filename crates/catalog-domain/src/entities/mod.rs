//! Domain entities with identity

mod product;

pub use product::Product;
