//! Validation stage
//!
//! Runs every validator registered for the request's exact type before the
//! handler sees it. Validators run concurrently; their failures are merged
//! into one [`CatalogError::Validation`] grouped by field in the order the
//! fields were first reported. A request with any failure never reaches its
//! handler.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::debug;

use super::{Next, PipelineStage};
use crate::{
    application::{request::ResponseEnvelope, validation::ValidatorRegistry},
    error::{CatalogError, CatalogResult},
};

/// Pipeline stage running registered validators
#[derive(Debug, Clone)]
pub struct ValidationStage {
    registry: Arc<ValidatorRegistry>,
}

impl ValidationStage {
    pub fn new(registry: Arc<ValidatorRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ValidatorRegistry {
        &self.registry
    }
}

#[async_trait]
impl PipelineStage for ValidationStage {
    fn name(&self) -> &'static str {
        "validation"
    }

    async fn invoke(&self, next: Next<'_>) -> CatalogResult<ResponseEnvelope> {
        let request = next.request();
        let validators = self.registry.validators_for(request.type_id());
        if validators.is_empty() {
            return next.run().await;
        }

        let cancel = next.cancellation();
        let checks = join_all(
            validators
                .iter()
                .map(|validator| validator.validate_envelope(request)),
        );

        // Validators in flight are dropped on cancellation.
        let outcomes = tokio::select! {
            outcomes = checks => outcomes,
            () = cancel.cancelled() => {
                return Err(CatalogError::Cancelled("validation cancelled"));
            }
        };

        if let Some(err) = CatalogError::validation(outcomes.into_iter().flatten()) {
            debug!(
                request = request.short_name(),
                fields = err.validation_errors().map_or(0, |errors| errors.len()),
                "Request failed validation"
            );
            return Err(err);
        }

        next.run().await
    }
}
