//! Client configuration.
//!
//! [`ClientConfig`] collects constructor parameters; [`ClientConfig::validate`]
//! checks them all up front and produces the values the client actually
//! uses, so a misconfigured client never sends a request.

use std::fmt;
use std::time::Duration;

use http::HeaderValue;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::defaults;
use super::error::ConfigError;
use crate::retry::RetryPolicy;

/// Parameters for constructing an [`ApiClient`](super::ApiClient).
///
/// The API key is never printed: `Debug` and `Display` redact it.
///
/// # Example
///
/// ```
/// use einvoice_client::{ClientConfig, RetryPolicy};
/// use std::time::Duration;
///
/// let config = ClientConfig::new("sk_test_123")
///     .with_base_url("https://sandbox.einvoice.dev/v1/")
///     .with_timeout(Duration::from_secs(10))
///     .with_retry_policy(RetryPolicy::new().with_max_attempts(2));
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
    timeout: Duration,
    user_agent: String,
    retry_policy: RetryPolicy,
    cancellation: CancellationToken,
}

impl ClientConfig {
    /// Creates a configuration with defaults for everything but the key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: defaults::BASE_URL.to_string(),
            timeout: defaults::timeout(),
            user_agent: defaults::USER_AGENT.to_string(),
            retry_policy: RetryPolicy::default(),
            cancellation: CancellationToken::new(),
        }
    }

    /// Sets the API base URL (for example a sandbox environment).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the per-attempt request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the retry policy applied to every request.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Sets a token that, once cancelled, aborts in-flight and future
    /// requests made by the client.
    #[must_use]
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Returns the configured base URL string.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the per-attempt timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Validates every parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The API key is empty or not a valid header value
    /// - The base URL is not an absolute `http`/`https` URL
    /// - The timeout is zero
    /// - The user agent is not a valid header value
    pub fn validate(&self) -> Result<ValidatedConfig, ConfigError> {
        let authorization = Self::resolve_authorization(&self.api_key)?;
        let base_url = Self::resolve_base_url(&self.base_url)?;

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: "must be greater than zero".to_string(),
            });
        }

        let user_agent = HeaderValue::from_str(&self.user_agent)
            .map_err(|_| ConfigError::InvalidUserAgent(self.user_agent.clone()))?;

        Ok(ValidatedConfig {
            base_url,
            authorization,
            user_agent,
            timeout: self.timeout,
            retry_policy: self.retry_policy.clone(),
            cancellation: self.cancellation.clone(),
        })
    }

    fn resolve_authorization(api_key: &str) -> Result<HeaderValue, ConfigError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }

        let mut value = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| ConfigError::InvalidApiKey)?;
        value.set_sensitive(true);
        Ok(value)
    }

    fn resolve_base_url(raw: &str) -> Result<Url, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: reason.to_string(),
        };

        let mut url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("must not contain a query or fragment"));
        }

        // Relative paths resolve under the last segment only with a trailing slash
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ClientConfig {{ base_url: {}, timeout: {}s, retry: {}x/{}ms..{}ms }}",
            self.base_url,
            self.timeout.as_secs(),
            self.retry_policy.max_attempts,
            self.retry_policy.base_delay.as_millis(),
            self.retry_policy.max_delay.as_millis(),
        )
    }
}

/// Configuration after validation, ready for use by the client.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    /// Base URL, always ending in `/`
    pub base_url: Url,
    /// Pre-built `Authorization` header (marked sensitive)
    pub authorization: HeaderValue,
    /// `User-Agent` header
    pub user_agent: HeaderValue,
    /// Per-attempt timeout
    pub timeout: Duration,
    /// Retry policy for every request
    pub retry_policy: RetryPolicy,
    /// Client-wide cancellation
    pub cancellation: CancellationToken,
}
