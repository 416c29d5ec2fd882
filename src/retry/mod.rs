//! Retry engine for transient API failures.
//!
//! This module provides:
//! - Backoff configuration ([`RetryPolicy`])
//! - Default retryability classification ([`IsRetryable`])
//! - The cancellable retry loop ([`RetryEngine`])

mod classify;
mod engine;
mod policy;


pub use classify::IsRetryable;
pub use engine::RetryEngine;
pub use policy::{RetryPolicy, RetryPredicate};
