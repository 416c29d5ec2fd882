//! The retry loop.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use super::RetryPolicy;
use crate::error::ApiError;
use crate::time::{Sleeper, TokioSleeper};

/// Runs an operation until it succeeds, fails permanently, runs out of
/// attempts, or is cancelled.
///
/// The engine holds no per-call state, so one instance can drive any number
/// of concurrent calls. Wrapped operations must be idempotent: a failed
/// attempt may still have taken effect on the server.
///
/// # Type Parameters
///
/// - `S`: The sleeper used between attempts (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```
/// use einvoice_client::{ApiError, ErrorKind, RetryEngine, RetryPolicy};
/// use einvoice_client::time::InstantSleeper;
///
/// # let rt = tokio::runtime::Runtime::new().unwrap();
/// # rt.block_on(async {
/// let engine = RetryEngine::new(RetryPolicy::new()).with_sleeper(InstantSleeper);
/// let mut calls = 0;
/// let result = engine
///     .execute(|| {
///         calls += 1;
///         let attempt = calls;
///         async move {
///             if attempt < 3 {
///                 Err(ApiError::new(ErrorKind::ServerError, "bad gateway"))
///             } else {
///                 Ok("done")
///             }
///         }
///     })
///     .await;
/// assert_eq!(result.unwrap(), "done");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct RetryEngine<S = TokioSleeper> {
    policy: RetryPolicy,
    sleeper: S,
}

impl RetryEngine<TokioSleeper> {
    /// Creates an engine that sleeps on the tokio timer.
    #[must_use]
    pub const fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            sleeper: TokioSleeper,
        }
    }
}

impl Default for RetryEngine<TokioSleeper> {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl<S> RetryEngine<S> {
    /// Replaces the sleeper used between attempts.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> RetryEngine<S2> {
        RetryEngine {
            policy: self.policy,
            sleeper,
        }
    }

    /// Returns the policy this engine applies.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<S: Sleeper> RetryEngine<S> {
    /// Runs `operation` under the retry policy.
    ///
    /// # Errors
    ///
    /// Returns the first non-retryable error, or the last error once
    /// attempts are exhausted. The error is returned unchanged.
    pub async fn execute<T, F, Fut>(&self, operation: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        self.execute_with_cancellation(operation, &CancellationToken::new())
            .await
    }

    /// Runs `operation` under the retry policy until `cancel` fires.
    ///
    /// Cancellation is observed before each attempt, while an attempt is in
    /// flight (the attempt future is dropped), and during backoff.
    ///
    /// # Errors
    ///
    /// As [`execute`](Self::execute), plus an
    /// [`ErrorKind::Cancelled`](crate::ErrorKind::Cancelled) error when the
    /// token fires.
    pub async fn execute_with_cancellation<T, F, Fut>(
        &self,
        mut operation: F,
        cancel: &CancellationToken,
    ) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut retry: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(ApiError::cancelled());
            }

            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(ApiError::cancelled()),
                result = operation() => result,
            };

            let err = match result {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !self.policy.is_retryable(&err) {
                tracing::debug!(kind = %err.kind(), attempt = retry + 1, "Not retrying: {err}");
                return Err(err);
            }

            if !self.policy.should_retry(retry + 1) {
                tracing::warn!(
                    kind = %err.kind(),
                    attempts = retry + 1,
                    "Giving up after exhausting retries: {err}"
                );
                return Err(err);
            }

            let delay = self.policy.delay_for_retry(retry, &err);
            tracing::warn!(
                kind = %err.kind(),
                status = err.status().map(|s| s.as_u16()),
                attempt = retry + 1,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "Retrying after transient failure: {err}"
            );

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(ApiError::cancelled()),
                () = self.sleeper.sleep(delay) => {}
            }

            retry += 1;
        }
    }
}
