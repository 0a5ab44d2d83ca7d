//! Failure taxonomy for catalog operations
//!
//! Taxonomy failures carry an [`ExceptionInfo`] (message, status, title) that
//! the HTTP boundary renders verbatim. Everything else is unclassified and is
//! reported to clients as a generic internal error.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::Serialize;

use crate::application::validation::ValidationFailure;
use catalog_domain::DomainError;

/// Result type alias for catalog operations
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Message, status code and title describing one kind of failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionInfo {
    message: Cow<'static, str>,
    status: u16,
    title: Cow<'static, str>,
}

impl ExceptionInfo {
    /// Create exception info with an owned or static message
    pub fn new(
        message: impl Into<Cow<'static, str>>,
        status: u16,
        title: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            message: message.into(),
            status,
            title: title.into(),
        }
    }

    /// Const constructor for shared, per-kind info values
    pub const fn from_static(message: &'static str, status: u16, title: &'static str) -> Self {
        Self {
            message: Cow::Borrowed(message),
            status,
            title: Cow::Borrowed(title),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Info shared by every validation failure
pub static VALIDATION_INFO: ExceptionInfo = ExceptionInfo::from_static(
    "One or more validation errors occurred.",
    400,
    "Validation Error",
);

/// Field-level validation errors, grouped by field in first-seen order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: IndexMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Group failures by field name.
    ///
    /// Returns `None` for an empty failure list: a validation error never
    /// exists without at least one message.
    pub fn from_failures(failures: impl IntoIterator<Item = ValidationFailure>) -> Option<Self> {
        let mut fields: IndexMap<String, Vec<String>> = IndexMap::new();
        for failure in failures {
            let (field, message) = failure.into_parts();
            fields.entry(field).or_default().push(message);
        }

        (!fields.is_empty()).then_some(Self { fields })
    }

    /// Messages recorded for a field
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Field names in first-seen order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of distinct fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True only for an empty map, which `from_failures` never builds
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(field, messages)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }
}

/// Main error type for catalog operations
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// One or more validators rejected the request
    #[error("{}", VALIDATION_INFO.message())]
    Validation(ValidationErrors),

    /// Requested product does not exist
    #[error("{}", .0.message())]
    ProductNotFound(ExceptionInfo),

    /// Request could not be decoded at the transport boundary
    #[error("{}", .0.message())]
    BadRequest(ExceptionInfo),

    /// Request body exceeded the configured limit
    #[error("{}", .0.message())]
    PayloadTooLarge(ExceptionInfo),

    /// Storage or domain invariant failure
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// No handler registered for the dispatched request type
    #[error("No handler registered for request type {request}")]
    HandlerNotRegistered {
        /// Rust type name of the request
        request: &'static str,
    },

    /// Dispatch was cancelled before completion
    #[error("Request cancelled: {0}")]
    Cancelled(&'static str),

    /// Unexpected internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// Create a validation error from collected failures.
    ///
    /// Returns `None` when `failures` is empty.
    pub fn validation(failures: impl IntoIterator<Item = ValidationFailure>) -> Option<Self> {
        ValidationErrors::from_failures(failures).map(Self::Validation)
    }

    /// Create a 400 bad-request error
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest(ExceptionInfo::new(message, 400, "Bad Request"))
    }

    /// Create a 413 error for an oversized request body
    pub fn payload_too_large(message: impl Into<Cow<'static, str>>) -> Self {
        Self::PayloadTooLarge(ExceptionInfo::new(message, 413, "Payload Too Large"))
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Status, title and message for taxonomy failures; `None` when unclassified
    pub fn info(&self) -> Option<&ExceptionInfo> {
        match self {
            Self::Validation(_) => Some(&VALIDATION_INFO),
            Self::ProductNotFound(info) | Self::BadRequest(info) | Self::PayloadTooLarge(info) => {
                Some(info)
            }
            Self::Domain(_)
            | Self::HandlerNotRegistered { .. }
            | Self::Cancelled(_)
            | Self::Internal(_) => None,
        }
    }

    /// Field errors, present only for validation failures
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Stable name of the failure kind, rendered as the problem `type`
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::ProductNotFound(_) => "ProductNotFound",
            Self::BadRequest(_) => "BadRequest",
            Self::PayloadTooLarge(_) => "PayloadTooLarge",
            Self::Domain(_) => "DomainError",
            Self::HandlerNotRegistered { .. } => "HandlerNotRegistered",
            Self::Cancelled(_) => "Cancelled",
            Self::Internal(_) => "InternalError",
        }
    }

    /// Whether this failure belongs to the client-facing taxonomy
    pub fn is_classified(&self) -> bool {
        self.info().is_some()
    }
}
