//! Retry policy configuration and delay computation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use super::IsRetryable;
use crate::error::ApiError;

/// Caller-supplied retryability predicate.
///
/// Replaces the default kind-based classifier when set on a
/// [`RetryPolicy`]. Two predicates compare equal only if they share the
/// same allocation.
#[derive(Clone)]
pub struct RetryPredicate(Arc<dyn Fn(&ApiError) -> bool + Send + Sync>);

impl RetryPredicate {
    /// Wraps a closure as a predicate.
    pub fn new(f: impl Fn(&ApiError) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Evaluates the predicate.
    #[must_use]
    pub fn matches(&self, err: &ApiError) -> bool {
        (self.0)(err)
    }
}

impl fmt::Debug for RetryPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RetryPredicate(..)")
    }
}

impl PartialEq for RetryPredicate {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Configuration for exponential backoff with jitter.
///
/// # Defaults
///
/// - `max_attempts`: 4 (one initial attempt plus three retries)
/// - `base_delay`: 1 second
/// - `max_delay`: 30 seconds
/// - `multiplier`: 2.0
/// - `jitter`: 0.1
///
/// # Example
///
/// ```
/// use einvoice_client::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::new()
///     .with_max_attempts(5)
///     .with_base_delay(Duration::from_millis(200))
///     .with_max_delay(Duration::from_secs(10))
///     .with_jitter(0.2);
///
/// assert_eq!(policy.backoff_delay(2), Duration::from_millis(800));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the initial one.
    ///
    /// A value of 1 disables retries.
    pub max_attempts: u32,

    /// Delay before the first retry, before jitter.
    pub base_delay: Duration,

    /// Cap applied to the exponential delay, before jitter.
    pub max_delay: Duration,

    /// Growth factor applied per retry.
    pub multiplier: f64,

    /// Fraction of the delay by which jitter may move it either way.
    pub jitter: f64,

    /// Overrides the default classifier when set.
    pub retry_if: Option<RetryPredicate>,
}

impl RetryPolicy {
    /// Default maximum attempts.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;

    /// Default base delay (1 second).
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

    /// Default maximum delay (30 seconds).
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

    /// Default multiplier (2.0).
    pub const DEFAULT_MULTIPLIER: f64 = 2.0;

    /// Default jitter fraction (10%).
    pub const DEFAULT_JITTER: f64 = 0.1;

    /// Minimum value for `max_attempts`.
    pub const MIN_MAX_ATTEMPTS: u32 = 1;

    /// Creates a policy with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            base_delay: Self::DEFAULT_BASE_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
            multiplier: Self::DEFAULT_MULTIPLIER,
            jitter: Self::DEFAULT_JITTER,
            retry_if: None,
        }
    }

    /// Creates a policy that never retries.
    #[must_use]
    pub fn no_retry() -> Self {
        Self::new().with_max_attempts(1)
    }

    /// Sets the maximum number of attempts.
    ///
    /// # Panics
    ///
    /// Panics if `max_attempts` is less than 1.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        assert!(
            max_attempts >= Self::MIN_MAX_ATTEMPTS,
            "max_attempts must be at least 1"
        );
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the base delay.
    ///
    /// Zero is allowed and useful in tests; it produces a tight retry loop.
    #[must_use]
    pub const fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Sets the delay cap.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the growth factor.
    ///
    /// # Panics
    ///
    /// Panics if `multiplier` is not positive and finite.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        assert!(
            multiplier.is_finite() && multiplier > 0.0,
            "multiplier must be positive"
        );
        self.multiplier = multiplier;
        self
    }

    /// Sets the jitter fraction.
    ///
    /// # Panics
    ///
    /// Panics if `jitter` is outside `0.0..=1.0`.
    #[must_use]
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&jitter),
            "jitter must be between 0.0 and 1.0"
        );
        self.jitter = jitter;
        self
    }

    /// Replaces the default classifier with `predicate`.
    #[must_use]
    pub fn with_retry_if(
        mut self,
        predicate: impl Fn(&ApiError) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.retry_if = Some(RetryPredicate::new(predicate));
        self
    }

    /// Returns true if `err` should be retried under this policy.
    #[must_use]
    pub fn is_retryable(&self, err: &ApiError) -> bool {
        self.retry_if
            .as_ref()
            .map_or_else(|| err.is_retryable(), |p| p.matches(err))
    }

    /// Returns true if another attempt is allowed after `attempt` attempts
    /// have been made (1 = the initial attempt has been made).
    #[must_use]
    pub const fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Exponential delay for a 0-indexed retry, capped at `max_delay`.
    ///
    /// No jitter is applied. A `base_delay` above `max_delay` is clamped.
    #[must_use]
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        if self.base_delay.is_zero() {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let millis = duration_millis(self.base_delay) * self.multiplier.powi(exponent);
        let capped = millis.min(duration_millis(self.max_delay));
        millis_to_duration(capped)
    }

    /// Perturbs `delay` by `delay * jitter * unit`.
    ///
    /// `unit` is clamped to `[-1.0, 1.0]`. The result is floored to whole
    /// milliseconds and never negative.
    #[must_use]
    pub fn apply_jitter(&self, delay: Duration, unit: f64) -> Duration {
        let millis = duration_millis(delay);
        let offset = millis * self.jitter * unit.clamp(-1.0, 1.0);
        millis_to_duration(millis + offset)
    }

    /// Delay to wait before the 0-indexed `retry`, given the error that
    /// triggered it.
    ///
    /// A positive server retry hint wins outright; otherwise the jittered
    /// exponential backoff is used.
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32, err: &ApiError) -> Duration {
        if let Some(seconds) = err.retry_after() {
            return Duration::from_secs(seconds);
        }
        let unit = rand::thread_rng().gen_range(-1.0..=1.0);
        self.apply_jitter(self.backoff_delay(retry), unit)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::cast_precision_loss)]
fn duration_millis(d: Duration) -> f64 {
    d.as_millis() as f64
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn millis_to_duration(millis: f64) -> Duration {
    if millis.is_nan() || millis <= 0.0 {
        return Duration::ZERO;
    }
    // `as` saturates at u64::MAX for out-of-range floats
    Duration::from_millis(millis.floor() as u64)
}
