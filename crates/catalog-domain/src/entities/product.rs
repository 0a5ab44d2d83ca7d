//! Product entity

use serde::{Deserialize, Serialize};

use crate::value_objects::ProductId;

/// A catalog product.
///
/// Every field is defaulted on deserialization so that incomplete payloads
/// reach request validation instead of failing inside the JSON decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Product {
    /// Document key
    #[serde(default = "ProductId::nil")]
    pub id: ProductId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Free-form category labels
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub description: String,
    /// Image file name relative to the media store
    #[serde(default)]
    pub image_file: String,
    /// Unit price
    #[serde(default)]
    pub price: f64,
}

impl Product {
    /// Create a product with a freshly generated identifier
    pub fn new(
        name: impl Into<String>,
        category: Vec<String>,
        description: impl Into<String>,
        image_file: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: ProductId::new(),
            name: name.into(),
            category,
            description: description.into(),
            image_file: image_file.into(),
            price,
        }
    }

    /// Replace the identifier, keeping every other field
    #[must_use]
    pub fn with_id(mut self, id: ProductId) -> Self {
        self.id = id;
        self
    }

    /// Case-insensitive substring match against any of the product's categories
    pub fn in_category(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.category
            .iter()
            .any(|category| category.to_lowercase().contains(&needle))
    }
}
