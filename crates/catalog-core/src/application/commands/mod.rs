//! Commands: requests that change catalog state

use serde::{Deserialize, Serialize};

use crate::application::request::Request;
use catalog_domain::{Product, ProductId};

/// Create a product; the store assigns its id
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateProductCommand {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_file: String,
    #[serde(default)]
    pub price: f64,
}

impl Request for CreateProductCommand {
    type Response = CreateProductResult;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProductResult {
    pub id: ProductId,
}

/// Replace an existing product.
///
/// Existence is the caller's concern; send
/// [`UpdateProductOrchestratorCommand`] to get a not-found failure for
/// unknown ids. Sent directly for a missing product, the commit fails with a
/// storage not-found error.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProductCommand {
    pub product: Product,
}

impl Request for UpdateProductCommand {
    type Response = UpdateProductResult;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProductResult {
    pub is_success: bool,
}

/// Delete a product by id. Existence is the caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteProductCommand {
    pub id: ProductId,
}

impl Request for DeleteProductCommand {
    type Response = bool;
}

/// Existence check followed by [`UpdateProductCommand`]
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProductOrchestratorCommand {
    pub product: Product,
}

impl Request for UpdateProductOrchestratorCommand {
    type Response = bool;
}

/// Existence check followed by [`DeleteProductCommand`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteProductOrchestratorCommand {
    pub id: ProductId,
}

impl Request for DeleteProductOrchestratorCommand {
    type Response = bool;
}
