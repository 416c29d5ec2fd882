//! Default retryability classification.

use crate::error::{ApiError, ErrorKind};

/// Extension trait for checking if an error is transient.
///
/// Used by [`RetryPolicy`](super::RetryPolicy) when no custom predicate is
/// configured.
pub trait IsRetryable {
    /// Returns true if the failure may succeed when retried unchanged.
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for ErrorKind {
    fn is_retryable(&self) -> bool {
        match self {
            // Throttling, 5xx and dropped connections are transient
            Self::RateLimited | Self::ServerError | Self::NetworkFailure => true,
            // Timeouts may have reached the server, so they are not replayed
            Self::Authentication
            | Self::Authorization
            | Self::Validation
            | Self::NotFound
            | Self::InsufficientBalance
            | Self::Timeout
            | Self::Cancelled
            | Self::Unknown => false,
        }
    }
}

impl IsRetryable for ApiError {
    fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}
