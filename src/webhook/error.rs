//! Error types for webhook handling.

use thiserror::Error;

/// Error type for webhook operations that can fail hard.
///
/// Signature checks never produce this type for bad input; they return
/// `false`. Only payload (de)serialization and header construction fail.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The payload is not a well-formed event envelope.
    #[error("Malformed webhook payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// A constructed header value contained characters HTTP forbids.
    #[error("Invalid webhook header value: {0}")]
    HeaderValue(#[from] http::header::InvalidHeaderValue),

    /// The delivery failed signature verification.
    #[error("Webhook signature verification failed")]
    InvalidSignature,
}
