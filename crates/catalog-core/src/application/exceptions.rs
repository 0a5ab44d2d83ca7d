//! Construction of taxonomy failures
//!
//! Handlers ask an [`ExceptionFactory`] for failures instead of formatting
//! messages themselves, so every not-found response reads the same.

use std::fmt;

use crate::error::{CatalogError, ExceptionInfo};
use catalog_domain::ProductId;

/// How a missing product was addressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductKey {
    Id(ProductId),
    /// Free-form identifier that is not a product id
    Identifier(String),
}

impl From<ProductId> for ProductKey {
    fn from(id: ProductId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for ProductKey {
    fn from(identifier: &str) -> Self {
        Self::Identifier(identifier.to_string())
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Identifier(identifier) => f.write_str(identifier),
        }
    }
}

/// Builds client-facing failures
pub trait ExceptionFactory: Send + Sync {
    fn product_not_found(&self, key: &ProductKey) -> CatalogError;
}

/// Message templates used by the catalog
#[derive(Debug, Default, Clone, Copy)]
pub struct CatalogExceptionFactory;

impl CatalogExceptionFactory {
    pub const PRODUCT_NOT_FOUND_STATUS: u16 = 404;
    pub const PRODUCT_NOT_FOUND_TITLE: &'static str = "Product Not Found";

    pub fn product_not_found_message(key: &ProductKey) -> String {
        match key {
            ProductKey::Id(id) => format!("Product with ID '{id}' was not found."),
            ProductKey::Identifier(identifier) => {
                format!("Product with identifier '{identifier}' was not found.")
            }
        }
    }
}

impl ExceptionFactory for CatalogExceptionFactory {
    fn product_not_found(&self, key: &ProductKey) -> CatalogError {
        CatalogError::ProductNotFound(ExceptionInfo::new(
            Self::product_not_found_message(key),
            Self::PRODUCT_NOT_FOUND_STATUS,
            Self::PRODUCT_NOT_FOUND_TITLE,
        ))
    }
}
