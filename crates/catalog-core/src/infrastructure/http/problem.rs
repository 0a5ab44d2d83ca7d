//! Problem envelope rendered for every failed request

use std::sync::Arc;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{error, warn};

use crate::{
    config::Environment,
    error::{CatalogError, ValidationErrors},
};

pub const INTERNAL_ERROR_TITLE: &str = "Internal Server Error";
pub const INTERNAL_ERROR_DETAIL: &str = "An error occurred while processing your request.";
const INTERNAL_ERROR_TYPE: &str = "InternalServerError";

/// JSON error body: `{status, title, detail, type, errors}`.
///
/// `errors` is `null` for everything except validation failures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemDetails {
    pub status: u16,
    pub title: String,
    pub detail: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub errors: Option<ValidationErrors>,
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Error carried out of a route in the response extensions so the
/// translation middleware can render it with full context
#[derive(Debug, Clone)]
pub struct UnhandledError(pub Arc<CatalogError>);

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let error = Arc::new(self);
        let mut response = ExceptionTranslator::new(Environment::Production)
            .problem(&error)
            .into_response();
        response.extensions_mut().insert(UnhandledError(error));
        response
    }
}

/// Maps failures to problem envelopes
#[derive(Debug, Clone, Copy, Default)]
pub struct ExceptionTranslator {
    environment: Environment,
}

impl ExceptionTranslator {
    pub fn new(environment: Environment) -> Self {
        Self { environment }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Build the envelope for `error` without logging
    pub fn problem(&self, error: &CatalogError) -> ProblemDetails {
        match error.info() {
            Some(info) => ProblemDetails {
                status: info.status(),
                title: info.title().to_string(),
                detail: info.message().to_string(),
                kind: error.kind().to_string(),
                errors: error.validation_errors().cloned(),
            },
            None => self.internal(error.kind(), &error.to_string()),
        }
    }

    /// Log `error` and build its envelope
    pub fn translate(&self, error: &CatalogError) -> ProblemDetails {
        match error {
            CatalogError::Validation(errors) => {
                warn!(
                    fields = ?errors.fields().collect::<Vec<_>>(),
                    "Validation error occurred"
                );
            }
            _ if error.is_classified() => {
                warn!(kind = error.kind(), message = %error, "Catalog exception occurred");
            }
            _ => {
                error!(kind = error.kind(), error = %error, "Unhandled exception occurred");
            }
        }

        self.problem(error)
    }

    /// Log a handler panic and build a 500 envelope
    pub fn panic(&self, message: &str) -> ProblemDetails {
        error!(panic = message, "Handler panicked");
        self.internal(INTERNAL_ERROR_TYPE, message)
    }

    fn internal(&self, kind: &str, raw: &str) -> ProblemDetails {
        let detail = if self.environment.is_development() {
            raw.to_string()
        } else {
            INTERNAL_ERROR_DETAIL.to_string()
        };

        ProblemDetails {
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            title: INTERNAL_ERROR_TITLE.to_string(),
            detail,
            kind: kind.to_string(),
            errors: None,
        }
    }
}
