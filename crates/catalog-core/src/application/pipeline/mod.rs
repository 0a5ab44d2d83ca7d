//! Pipeline stages wrapped around every dispatched request
//!
//! The dispatcher owns one ordered list of stages shared by all request
//! types. A dispatch enters the first stage with a [`Next`] continuation; each
//! stage decides whether to call [`Next::run`] (forward) or return early
//! (short-circuit). After the last stage, `Next::run` invokes the handler.

pub mod logging;
pub mod validation;

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::{
    application::{
        dispatcher::{DispatchContext, ErasedHandler},
        request::{RequestEnvelope, ResponseEnvelope},
    },
    error::CatalogResult,
};

pub use logging::LoggingStage;
pub use validation::ValidationStage;

/// A cross-cutting behavior invoked around a handler
#[async_trait]
pub trait PipelineStage: Send + Sync {
    /// Stage name for diagnostics
    fn name(&self) -> &'static str;

    /// Process the request, forwarding through `next` or short-circuiting
    async fn invoke(&self, next: Next<'_>) -> CatalogResult<ResponseEnvelope>;
}

/// Continuation handed to a stage: the remaining stages plus the handler
pub struct Next<'a> {
    request: RequestEnvelope,
    stages: &'a [Arc<dyn PipelineStage>],
    handler: &'a dyn ErasedHandler,
    ctx: DispatchContext<'a>,
}

impl<'a> Next<'a> {
    pub(crate) fn new(
        request: RequestEnvelope,
        stages: &'a [Arc<dyn PipelineStage>],
        handler: &'a dyn ErasedHandler,
        ctx: DispatchContext<'a>,
    ) -> Self {
        Self {
            request,
            stages,
            handler,
            ctx,
        }
    }

    /// The request travelling through the chain
    pub fn request(&self) -> &RequestEnvelope {
        &self.request
    }

    pub fn cancellation(&self) -> &'a CancellationToken {
        self.ctx.cancellation()
    }

    /// Nesting level of this dispatch; zero for requests sent from the boundary
    pub fn depth(&self) -> usize {
        self.ctx.depth()
    }

    /// Invoke the next stage, or the handler once all stages have run
    pub fn run(self) -> BoxFuture<'a, CatalogResult<ResponseEnvelope>> {
        Box::pin(async move {
            let Next {
                request,
                stages,
                handler,
                ctx,
            } = self;

            match stages.split_first() {
                Some((stage, rest)) => {
                    stage
                        .invoke(Next {
                            request,
                            stages: rest,
                            handler,
                            ctx,
                        })
                        .await
                }
                None => {
                    ctx.ensure_active()?;
                    handler.handle_envelope(request, &ctx).await
                }
            }
        })
    }
}

impl std::fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Next")
            .field("request", &self.request)
            .field("remaining_stages", &self.stages.len())
            .finish_non_exhaustive()
    }
}
