//! Transport-level errors.

use thiserror::Error;

/// Failure to complete an HTTP exchange.
///
/// A response with a non-2xx status is not an `HttpError`; these variants
/// only describe requests that never produced a response.
#[derive(Debug, Error)]
pub enum HttpError {
    /// DNS, connect, TLS or mid-body I/O failure.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server did not respond within the per-attempt timeout.
    #[error("Request timed out")]
    Timeout,

    /// The request could not be built, usually because of a malformed URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
