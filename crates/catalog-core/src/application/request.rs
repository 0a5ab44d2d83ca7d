//! Typed requests and their type-erased envelopes

use std::any::{Any, TypeId, type_name};

use crate::error::{CatalogError, CatalogResult};

/// An immutable description of an intended operation.
///
/// Each request type names the response its handler produces. Commands that
/// only signal completion use `()`.
pub trait Request: Send + Sync + 'static {
    /// Value produced by the request's handler
    type Response: Send + 'static;
}

/// A request with its concrete type erased, as seen by pipeline stages
pub struct RequestEnvelope {
    type_id: TypeId,
    type_name: &'static str,
    payload: Box<dyn Any + Send + Sync>,
}

impl RequestEnvelope {
    pub fn new<R: Request>(request: R) -> Self {
        Self {
            type_id: TypeId::of::<R>(),
            type_name: type_name::<R>(),
            payload: Box::new(request),
        }
    }

    /// Exact type of the wrapped request
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Rust type name of the wrapped request, for logging
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Short type name without the module path
    pub fn short_name(&self) -> &'static str {
        self.type_name.rsplit("::").next().unwrap_or(self.type_name)
    }

    pub fn downcast_ref<R: Request>(&self) -> Option<&R> {
        self.payload.downcast_ref::<R>()
    }

    /// Take the request back out by value
    pub fn into_inner<R: Request>(self) -> CatalogResult<R> {
        let type_name = self.type_name;
        self.payload
            .downcast::<R>()
            .map(|request| *request)
            .map_err(|_| {
                CatalogError::internal(format!(
                    "request envelope holds {type_name}, expected {}",
                    std::any::type_name::<R>()
                ))
            })
    }
}

impl std::fmt::Debug for RequestEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestEnvelope")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// A handler response with its concrete type erased
pub struct ResponseEnvelope {
    payload: Box<dyn Any + Send>,
}

impl ResponseEnvelope {
    pub fn new<T: Send + 'static>(response: T) -> Self {
        Self {
            payload: Box::new(response),
        }
    }

    pub fn into_inner<T: Send + 'static>(self) -> CatalogResult<T> {
        self.payload.downcast::<T>().map(|response| *response).map_err(|_| {
            CatalogError::internal(format!(
                "response envelope does not hold {}",
                std::any::type_name::<T>()
            ))
        })
    }
}

impl std::fmt::Debug for ResponseEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseEnvelope").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping(u32);

    impl Request for Ping {
        type Response = u32;
    }

    #[derive(Debug)]
    struct Other;

    impl Request for Other {
        type Response = ();
    }

    #[test]
    fn test_envelope_preserves_type() {
        let envelope = RequestEnvelope::new(Ping(7));
        assert_eq!(envelope.type_id(), TypeId::of::<Ping>());
        assert_eq!(envelope.short_name(), "Ping");
        assert_eq!(envelope.downcast_ref::<Ping>().map(|p| p.0), Some(7));
        assert!(envelope.downcast_ref::<Other>().is_none());
        assert_eq!(envelope.into_inner::<Ping>().unwrap().0, 7);
    }

    #[test]
    fn test_envelope_type_mismatch_is_internal_error() {
        let envelope = RequestEnvelope::new(Ping(1));
        let err = envelope.into_inner::<Other>().unwrap_err();
        assert!(matches!(err, CatalogError::Internal(_)));
    }

    #[test]
    fn test_response_envelope_unit() {
        let envelope = ResponseEnvelope::new(());
        envelope.into_inner::<()>().unwrap();

        let envelope = ResponseEnvelope::new(5u32);
        assert!(envelope.into_inner::<String>().is_err());
    }
}
