//! Error types for client configuration.

use thiserror::Error;

use crate::transport::HttpError;

/// Error type for building an [`ApiClient`](super::ApiClient).
///
/// All of these are caller mistakes detected before any request is sent.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The API key is empty or whitespace.
    #[error("API key must not be empty")]
    EmptyApiKey,

    /// The API key contains characters that cannot appear in a header.
    #[error("API key contains characters not allowed in an HTTP header")]
    InvalidApiKey,

    /// Invalid base URL provided.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The invalid URL string
        url: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid duration value.
    #[error("Invalid duration for {field}: {reason}")]
    InvalidDuration {
        /// Name of the field
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid `User-Agent` value.
    #[error("Invalid user agent '{0}'")]
    InvalidUserAgent(String),

    /// The production HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] HttpError),
}
