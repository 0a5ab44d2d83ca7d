//! Queries: read-only requests

use serde::{Deserialize, Serialize};

use crate::application::request::Request;
use catalog_domain::{Product, ProductId};

/// Every product in the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetProductsQuery;

impl Request for GetProductsQuery {
    type Response = GetProductsResult;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetProductsResult {
    pub products: Vec<Product>,
}

/// One product by id; fails with a not-found error when absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetProductByIdQuery {
    pub id: ProductId,
}

impl Request for GetProductByIdQuery {
    type Response = GetProductByIdResult;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetProductByIdResult {
    pub product: Product,
}

/// Products with any category containing `category`, ignoring case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetProductsByCategoryQuery {
    pub category: String,
}

impl Request for GetProductsByCategoryQuery {
    type Response = GetProductsByCategoryResult;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetProductsByCategoryResult {
    pub products: Vec<Product>,
}
