//! Error taxonomy shared by every API call.
//!
//! A single [`ApiError`] value carries an [`ErrorKind`] plus whatever
//! context the failure produced. The retry engine decides retryability by
//! switching on the kind, never on the concrete error source.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::transport::HttpError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Classification of an API failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The API key was missing or rejected (401).
    Authentication,
    /// The API key is valid but lacks permission (403).
    Authorization,
    /// The request was rejected as invalid (400, 422).
    Validation,
    /// The server throttled the request (429).
    RateLimited,
    /// The requested resource does not exist (404).
    NotFound,
    /// The account has no remaining credit for the operation (402).
    InsufficientBalance,
    /// A 5xx-class server failure.
    ServerError,
    /// Transport-level connectivity failure.
    NetworkFailure,
    /// The request or the server timed out.
    Timeout,
    /// The caller cancelled the operation.
    Cancelled,
    /// Anything not covered above.
    Unknown,
}

impl ErrorKind {
    /// Returns a stable, snake-case name for logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Authorization => "authorization",
            Self::Validation => "validation",
            Self::RateLimited => "rate_limited",
            Self::NotFound => "not_found",
            Self::InsufficientBalance => "insufficient_balance",
            Self::ServerError => "server_error",
            Self::NetworkFailure => "network_failure",
            Self::Timeout => "timeout",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }

    /// Maps a non-success HTTP status to an error kind.
    #[must_use]
    pub fn from_status(status: http::StatusCode) -> Self {
        match status.as_u16() {
            400 | 422 => Self::Validation,
            401 => Self::Authentication,
            402 => Self::InsufficientBalance,
            403 => Self::Authorization,
            404 => Self::NotFound,
            408 => Self::Timeout,
            429 => Self::RateLimited,
            _ if status.is_server_error() => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform error value returned by every API call.
///
/// Construct with [`ApiError::new`] and enrich with the `with_*` methods.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    status: Option<http::StatusCode>,
    field_errors: BTreeMap<String, Vec<String>>,
    details: Option<serde_json::Value>,
    retry_after: Option<u64>,
    #[source]
    source: Option<BoxError>,
}

impl ApiError {
    /// Creates an error of the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            field_errors: BTreeMap::new(),
            details: None,
            retry_after: None,
            source: None,
        }
    }

    /// Creates the error returned when a cancellation token fires.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "operation cancelled")
    }

    /// Attaches the HTTP status that produced this error.
    #[must_use]
    pub const fn with_status(mut self, status: http::StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches a server-supplied retry hint in seconds.
    ///
    /// A hint of zero is stored as absent.
    #[must_use]
    pub const fn with_retry_after(mut self, seconds: Option<u64>) -> Self {
        self.retry_after = match seconds {
            Some(0) | None => None,
            Some(s) => Some(s),
        };
        self
    }

    /// Attaches field-level validation messages.
    #[must_use]
    pub fn with_field_errors(mut self, field_errors: BTreeMap<String, Vec<String>>) -> Self {
        self.field_errors = field_errors;
        self
    }

    /// Attaches the raw error details reported by the server.
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attaches an underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status, if the error came from a response.
    #[must_use]
    pub const fn status(&self) -> Option<http::StatusCode> {
        self.status
    }

    /// Returns the server's retry hint in seconds, if any.
    #[must_use]
    pub const fn retry_after(&self) -> Option<u64> {
        self.retry_after
    }

    /// Returns field-level validation messages keyed by field name.
    #[must_use]
    pub const fn field_errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.field_errors
    }

    /// Returns the raw error details, if the server sent any.
    #[must_use]
    pub const fn details(&self) -> Option<&serde_json::Value> {
        self.details.as_ref()
    }
}

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        let kind = match &err {
            HttpError::Connection(_) => ErrorKind::NetworkFailure,
            HttpError::Timeout => ErrorKind::Timeout,
            HttpError::InvalidUrl(_) => ErrorKind::Unknown,
        };
        Self::new(kind, err.to_string()).with_source(err)
    }
}
