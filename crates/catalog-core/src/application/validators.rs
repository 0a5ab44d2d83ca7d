//! Product validators registered with the validation stage

use async_trait::async_trait;

use crate::application::{
    commands::{
        CreateProductCommand, DeleteProductCommand, DeleteProductOrchestratorCommand,
        UpdateProductCommand, UpdateProductOrchestratorCommand,
    },
    validation::{ValidationFailure, Validator, ValidatorRegistry},
};
use catalog_domain::{Product, ProductId};

fn check_id(field: &str, id: ProductId, failures: &mut Vec<ValidationFailure>) {
    if id.is_nil() {
        failures.push(ValidationFailure::new(field, "Product ID is required."));
    }
}

fn check_name(field: &str, name: &str, failures: &mut Vec<ValidationFailure>) {
    if name.trim().is_empty() {
        failures.push(ValidationFailure::new(field, "Product Name is required."));
    }
}

fn check_price(field: &str, price: f64, failures: &mut Vec<ValidationFailure>) {
    if price.is_nan() || price <= 0.0 {
        failures.push(ValidationFailure::new(
            field,
            "Product Price must be greater than 0.",
        ));
    }
}

/// Rules for a full product replacement; fields are prefixed with `Product.`
#[derive(Debug, Default, Clone, Copy)]
pub struct UpdateProductValidator;

impl UpdateProductValidator {
    fn check(product: &Product) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();
        check_id("Product.Id", product.id, &mut failures);
        check_name("Product.Name", &product.name, &mut failures);
        check_price("Product.Price", product.price, &mut failures);
        failures
    }
}

#[async_trait]
impl Validator<UpdateProductOrchestratorCommand> for UpdateProductValidator {
    async fn validate(&self, request: &UpdateProductOrchestratorCommand) -> Vec<ValidationFailure> {
        Self::check(&request.product)
    }
}

#[async_trait]
impl Validator<UpdateProductCommand> for UpdateProductValidator {
    async fn validate(&self, request: &UpdateProductCommand) -> Vec<ValidationFailure> {
        Self::check(&request.product)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CreateProductValidator;

#[async_trait]
impl Validator<CreateProductCommand> for CreateProductValidator {
    async fn validate(&self, request: &CreateProductCommand) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();
        check_name("Name", &request.name, &mut failures);
        if request.category.is_empty() {
            failures.push(ValidationFailure::new("Category", "Category is required."));
        }
        if request.image_file.trim().is_empty() {
            failures.push(ValidationFailure::new("ImageFile", "ImageFile is required."));
        }
        check_price("Price", request.price, &mut failures);
        failures
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DeleteProductValidator;

#[async_trait]
impl Validator<DeleteProductOrchestratorCommand> for DeleteProductValidator {
    async fn validate(&self, request: &DeleteProductOrchestratorCommand) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();
        check_id("Id", request.id, &mut failures);
        failures
    }
}

#[async_trait]
impl Validator<DeleteProductCommand> for DeleteProductValidator {
    async fn validate(&self, request: &DeleteProductCommand) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();
        check_id("Id", request.id, &mut failures);
        failures
    }
}

/// The catalog's validator set
pub fn catalog_validators() -> ValidatorRegistry {
    ValidatorRegistry::builder()
        .register::<CreateProductCommand, _>(CreateProductValidator)
        .register::<UpdateProductOrchestratorCommand, _>(UpdateProductValidator)
        .register::<UpdateProductCommand, _>(UpdateProductValidator)
        .register::<DeleteProductOrchestratorCommand, _>(DeleteProductValidator)
        .register::<DeleteProductCommand, _>(DeleteProductValidator)
        .build()
}
