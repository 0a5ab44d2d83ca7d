//! Request tracing stage

use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{Next, PipelineStage};
use crate::{application::request::ResponseEnvelope, error::CatalogResult};

/// Logs each request on entry and its outcome on exit.
///
/// Never alters the result. Classified failures are logged at debug level
/// since they are expected outcomes; unclassified ones at warn.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingStage;

impl LoggingStage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PipelineStage for LoggingStage {
    fn name(&self) -> &'static str {
        "logging"
    }

    async fn invoke(&self, next: Next<'_>) -> CatalogResult<ResponseEnvelope> {
        let request = next.request().short_name();
        let depth = next.depth();
        let started = Instant::now();

        debug!(request, depth, "Handling request");
        let result = next.run().await;
        let elapsed_us = started.elapsed().as_micros() as u64;

        match &result {
            Ok(_) => debug!(request, depth, elapsed_us, "Request handled"),
            Err(err) if err.is_classified() => {
                debug!(request, depth, elapsed_us, kind = err.kind(), "Request rejected")
            }
            Err(err) => warn!(request, depth, elapsed_us, error = %err, "Request failed"),
        }

        result
    }
}
