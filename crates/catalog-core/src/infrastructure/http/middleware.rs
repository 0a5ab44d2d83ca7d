//! HTTP middleware translating failures into problem envelopes

use std::any::Any;

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::catch_panic::ResponseForPanic;

use super::problem::{ExceptionTranslator, UnhandledError};

/// Re-render any error a route returned.
///
/// Routes return `Result<_, CatalogError>`; the error's own response is a
/// production-safe placeholder that carries the original error in its
/// extensions. This middleware logs it and renders the envelope for the
/// configured environment. Successful responses pass through untouched.
pub async fn exception_translation(
    State(translator): State<ExceptionTranslator>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    match response.extensions().get::<UnhandledError>().cloned() {
        Some(UnhandledError(error)) => translator.translate(&error).into_response(),
        None => response,
    }
}

/// Turns a handler panic into a 500 envelope
#[derive(Debug, Clone, Copy)]
pub struct PanicResponder {
    translator: ExceptionTranslator,
}

impl PanicResponder {
    pub fn new(translator: ExceptionTranslator) -> Self {
        Self { translator }
    }
}

impl ResponseForPanic for PanicResponder {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Body> {
        let message = if let Some(s) = err.downcast_ref::<String>() {
            s.as_str()
        } else if let Some(s) = err.downcast_ref::<&str>() {
            s
        } else {
            "handler panicked"
        };

        self.translator.panic(message).into_response()
    }
}
