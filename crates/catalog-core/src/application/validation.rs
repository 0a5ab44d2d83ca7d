//! Request validators and their per-type registry

use std::any::TypeId;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::request::{Request, RequestEnvelope};

/// A single rule violation reported by a validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    field: String,
    message: String,
}

impl ValidationFailure {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_parts(self) -> (String, String) {
        (self.field, self.message)
    }
}

/// Inspects a request and reports every rule it violates.
///
/// Validators must be pure functions of the request: the validation stage runs
/// all validators for a request concurrently.
#[async_trait]
pub trait Validator<R: Request>: Send + Sync {
    async fn validate(&self, request: &R) -> Vec<ValidationFailure>;
}

/// Object-safe view of a validator over a type-erased request
#[async_trait]
pub trait ErasedValidator: Send + Sync {
    /// Validate the wrapped request; a request of another type yields no failures
    async fn validate_envelope(&self, request: &RequestEnvelope) -> Vec<ValidationFailure>;
}

struct ValidatorAdapter<R, V> {
    validator: V,
    _request: PhantomData<fn(&R)>,
}

#[async_trait]
impl<R, V> ErasedValidator for ValidatorAdapter<R, V>
where
    R: Request,
    V: Validator<R>,
{
    async fn validate_envelope(&self, request: &RequestEnvelope) -> Vec<ValidationFailure> {
        match request.downcast_ref::<R>() {
            Some(request) => self.validator.validate(request).await,
            None => Vec::new(),
        }
    }
}

/// Validators keyed by exact request type.
///
/// Built once at startup and read concurrently afterwards.
#[derive(Default, Clone)]
pub struct ValidatorRegistry {
    validators: HashMap<TypeId, Vec<Arc<dyn ErasedValidator>>>,
}

impl ValidatorRegistry {
    pub fn builder() -> ValidatorRegistryBuilder {
        ValidatorRegistryBuilder::default()
    }

    /// Registry with no validators; every request passes validation
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validators registered for a request type, in registration order.
    ///
    /// Returns an empty slice when none are registered.
    pub fn validators_for(&self, request_type: TypeId) -> &[Arc<dyn ErasedValidator>] {
        self.validators
            .get(&request_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn validators_for_request<R: Request>(&self) -> &[Arc<dyn ErasedValidator>] {
        self.validators_for(TypeId::of::<R>())
    }

    /// Total number of registered validators
    pub fn len(&self) -> usize {
        self.validators.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("request_types", &self.validators.len())
            .field("validators", &self.len())
            .finish()
    }
}

/// Builder for [`ValidatorRegistry`]
#[derive(Default)]
pub struct ValidatorRegistryBuilder {
    validators: HashMap<TypeId, Vec<Arc<dyn ErasedValidator>>>,
}

impl ValidatorRegistryBuilder {
    /// Add a validator for request type `R`
    #[must_use]
    pub fn register<R, V>(mut self, validator: V) -> Self
    where
        R: Request,
        V: Validator<R> + 'static,
    {
        self.validators
            .entry(TypeId::of::<R>())
            .or_default()
            .push(Arc::new(ValidatorAdapter {
                validator,
                _request: PhantomData,
            }));
        self
    }

    pub fn build(self) -> ValidatorRegistry {
        ValidatorRegistry {
            validators: self.validators,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Rename {
        name: String,
    }

    impl Request for Rename {
        type Response = ();
    }

    struct Unvalidated;

    impl Request for Unvalidated {
        type Response = ();
    }

    struct NameRequired;

    #[async_trait]
    impl Validator<Rename> for NameRequired {
        async fn validate(&self, request: &Rename) -> Vec<ValidationFailure> {
            if request.name.is_empty() {
                vec![ValidationFailure::new("Name", "Name is required.")]
            } else {
                Vec::new()
            }
        }
    }

    #[test]
    fn test_lookup_without_validators_is_empty() {
        let registry = ValidatorRegistry::empty();
        assert!(registry.validators_for_request::<Rename>().is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lookup_is_by_exact_type() {
        let registry = ValidatorRegistry::builder()
            .register::<Rename, _>(NameRequired)
            .register::<Rename, _>(NameRequired)
            .build();

        assert_eq!(registry.validators_for_request::<Rename>().len(), 2);
        assert!(registry.validators_for_request::<Unvalidated>().is_empty());
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_erased_validator_downcasts() {
        let registry = ValidatorRegistry::builder()
            .register::<Rename, _>(NameRequired)
            .build();
        let validator = &registry.validators_for_request::<Rename>()[0];

        let failures = validator
            .validate_envelope(&RequestEnvelope::new(Rename {
                name: String::new(),
            }))
            .await;
        assert_eq!(failures, vec![ValidationFailure::new("Name", "Name is required.")]);

        let failures = validator
            .validate_envelope(&RequestEnvelope::new(Unvalidated))
            .await;
        assert!(failures.is_empty());
    }
}
