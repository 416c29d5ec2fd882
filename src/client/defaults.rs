//! Default values for client configuration.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default API base URL. Paths are resolved relative to it.
pub const BASE_URL: &str = "https://api.einvoice.dev/v1/";

/// Default per-attempt request timeout in seconds.
pub const TIMEOUT_SECS: u64 = 30;

/// Default `User-Agent` header.
pub const USER_AGENT: &str = concat!("einvoice-client/", env!("CARGO_PKG_VERSION"));

/// Default per-attempt request timeout as Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_secs(TIMEOUT_SECS)
}
