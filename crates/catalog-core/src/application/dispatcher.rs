//! Request dispatcher
//!
//! Routes each request to the single handler registered for its exact type,
//! threading it through the shared pipeline stages first. The registration
//! table is written once by [`DispatcherBuilder`] and only read afterwards, so
//! dispatching takes no locks.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::{
    application::{
        pipeline::{Next, PipelineStage},
        request::{Request, RequestEnvelope, ResponseEnvelope},
    },
    error::{CatalogError, CatalogResult},
};

/// Handles one request type.
///
/// The returned future is named by the trait rather than boxed; only the
/// erased [`ErasedHandler`] layer pays for an allocation. Implementations
/// write `async fn handle`.
pub trait RequestHandler<R: Request>: Send + Sync {
    fn handle(
        &self,
        request: R,
        ctx: &DispatchContext<'_>,
    ) -> impl Future<Output = CatalogResult<R::Response>> + Send;
}

impl<R, H> RequestHandler<R> for Arc<H>
where
    R: Request,
    H: RequestHandler<R>,
{
    fn handle(
        &self,
        request: R,
        ctx: &DispatchContext<'_>,
    ) -> impl Future<Output = CatalogResult<R::Response>> + Send {
        (**self).handle(request, ctx)
    }
}

/// Object-safe handler over type-erased requests
#[async_trait]
pub trait ErasedHandler: Send + Sync {
    async fn handle_envelope(
        &self,
        request: RequestEnvelope,
        ctx: &DispatchContext<'_>,
    ) -> CatalogResult<ResponseEnvelope>;
}

struct HandlerAdapter<R, H> {
    handler: H,
    _request: PhantomData<fn(R)>,
}

#[async_trait]
impl<R, H> ErasedHandler for HandlerAdapter<R, H>
where
    R: Request,
    H: RequestHandler<R>,
{
    async fn handle_envelope(
        &self,
        request: RequestEnvelope,
        ctx: &DispatchContext<'_>,
    ) -> CatalogResult<ResponseEnvelope> {
        let request = request.into_inner::<R>()?;
        self.handler
            .handle(request, ctx)
            .await
            .map(ResponseEnvelope::new)
    }
}

/// What a handler sees of the dispatch it runs in.
///
/// Nested requests sent through the context share the caller's cancellation
/// token and pass through the full pipeline again.
#[derive(Clone, Copy)]
pub struct DispatchContext<'a> {
    dispatcher: &'a Dispatcher,
    cancel: &'a CancellationToken,
    depth: usize,
}

impl<'a> DispatchContext<'a> {
    /// Dispatch a nested request
    pub async fn send<R: Request>(&self, request: R) -> CatalogResult<R::Response> {
        self.dispatcher
            .dispatch(request, self.cancel, self.depth + 1)
            .await
    }

    pub fn cancellation(&self) -> &'a CancellationToken {
        self.cancel
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Fail with [`CatalogError::Cancelled`] if the dispatch was cancelled.
    ///
    /// Handlers call this before their first side effect.
    pub fn ensure_active(&self) -> CatalogResult<()> {
        if self.cancel.is_cancelled() {
            Err(CatalogError::Cancelled("dispatch cancelled before completion"))
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for DispatchContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchContext")
            .field("depth", &self.depth)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

struct Registration {
    request: &'static str,
    handler: Arc<dyn ErasedHandler>,
}

/// Routes requests through the pipeline to their handlers
pub struct Dispatcher {
    handlers: HashMap<TypeId, Registration>,
    stages: Vec<Arc<dyn PipelineStage>>,
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Dispatch a request and wait for its response.
    ///
    /// Returns [`CatalogError::HandlerNotRegistered`] when the request type was
    /// never registered; that is a wiring defect, not a business failure.
    pub async fn send<R: Request>(
        &self,
        request: R,
        cancel: &CancellationToken,
    ) -> CatalogResult<R::Response> {
        self.dispatch(request, cancel, 0).await
    }

    async fn dispatch<R: Request>(
        &self,
        request: R,
        cancel: &CancellationToken,
        depth: usize,
    ) -> CatalogResult<R::Response> {
        if cancel.is_cancelled() {
            return Err(CatalogError::Cancelled("dispatch cancelled before start"));
        }

        let Some(registration) = self.handlers.get(&TypeId::of::<R>()) else {
            let request = type_name::<R>();
            error!(request, "No handler registered for request type");
            return Err(CatalogError::HandlerNotRegistered { request });
        };

        let ctx = DispatchContext {
            dispatcher: self,
            cancel,
            depth,
        };
        let next = Next::new(
            RequestEnvelope::new(request),
            &self.stages,
            registration.handler.as_ref(),
            ctx,
        );

        next.run().await?.into_inner::<R::Response>()
    }

    /// Whether a handler is registered for `R`
    pub fn handles<R: Request>(&self) -> bool {
        self.handlers.contains_key(&TypeId::of::<R>())
    }

    /// Names of the pipeline stages in invocation order
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Type names of every registered request
    pub fn registered_requests(&self) -> Vec<&'static str> {
        let mut requests: Vec<_> = self.handlers.values().map(|r| r.request).collect();
        requests.sort_unstable();
        requests
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handlers", &self.handlers.len())
            .field("stages", &self.stage_names())
            .finish()
    }
}

/// Startup wiring errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Duplicate handler registration for request type {request}")]
    DuplicateHandler { request: &'static str },
}

/// Builder collecting stages and handler registrations
#[derive(Default)]
pub struct DispatcherBuilder {
    handlers: HashMap<TypeId, Registration>,
    duplicates: Vec<&'static str>,
    stages: Vec<Arc<dyn PipelineStage>>,
}

impl DispatcherBuilder {
    /// Append a stage; stages run in the order they are added
    #[must_use]
    pub fn stage<S: PipelineStage + 'static>(mut self, stage: S) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Register the handler for request type `R`
    #[must_use]
    pub fn register<R, H>(mut self, handler: H) -> Self
    where
        R: Request,
        H: RequestHandler<R> + 'static,
    {
        let request = type_name::<R>();
        match self.handlers.entry(TypeId::of::<R>()) {
            Entry::Occupied(_) => self.duplicates.push(request),
            Entry::Vacant(slot) => {
                slot.insert(Registration {
                    request,
                    handler: Arc::new(HandlerAdapter {
                        handler,
                        _request: PhantomData::<fn(R)>,
                    }),
                });
            }
        }
        self
    }

    /// Finish wiring.
    ///
    /// Fails on the first request type that was registered more than once.
    pub fn build(self) -> Result<Dispatcher, ConfigurationError> {
        if let Some(request) = self.duplicates.first() {
            return Err(ConfigurationError::DuplicateHandler { request });
        }

        Ok(Dispatcher {
            handlers: self.handlers,
            stages: self.stages,
        })
    }
}
