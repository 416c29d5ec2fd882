//! The API client.

use http::HeaderValue;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::config::{ClientConfig, ValidatedConfig};
use super::error::ConfigError;
use super::request::ApiRequest;
use super::response::{decode_json, error_from_response};
use crate::error::ApiError;
use crate::retry::{RetryEngine, RetryPolicy};
use crate::time::{Clock, Sleeper, SystemClock, TokioSleeper};
use crate::transport::{HttpClient, HttpRequest, HttpResponse, ReqwestClient};

/// Typed client for the e-invoicing API.
///
/// Every call goes through the same [`RetryEngine`], so transient failures
/// (429, 5xx, network errors) are retried with backoff and the server's
/// `Retry-After` hint is honored.
///
/// # Type Parameters
///
/// - `H`: The HTTP transport (defaults to [`ReqwestClient`])
/// - `S`: The sleeper used between retries (defaults to [`TokioSleeper`])
/// - `C`: Clock that HTTP-date `Retry-After` values are measured against
///   (defaults to [`SystemClock`])
///
/// # Example
///
/// ```no_run
/// use einvoice_client::{ApiClient, ClientConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::new(ClientConfig::new("sk_live_..."))?;
/// let page = client.invoices().list(&Default::default()).await?;
/// for invoice in page.data {
///     println!("{} {:?}", invoice.id, invoice.status);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient<H = ReqwestClient, S = TokioSleeper, C = SystemClock> {
    http: H,
    engine: RetryEngine<S>,
    clock: C,
    base_url: Url,
    authorization: HeaderValue,
    user_agent: HeaderValue,
    cancellation: CancellationToken,
}

impl ApiClient<ReqwestClient, TokioSleeper, SystemClock> {
    /// Creates a client backed by reqwest.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let validated = config.validate()?;
        let http = ReqwestClient::with_timeout(validated.timeout).map_err(ConfigError::HttpClient)?;
        Ok(Self::from_validated(validated, http))
    }
}

impl<H: HttpClient> ApiClient<H, TokioSleeper, SystemClock> {
    /// Creates a client on top of a caller-supplied transport.
    ///
    /// The configured timeout is not applied; the transport owns it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is invalid.
    pub fn with_http_client(config: ClientConfig, http: H) -> Result<Self, ConfigError> {
        Ok(Self::from_validated(config.validate()?, http))
    }

    fn from_validated(config: ValidatedConfig, http: H) -> Self {
        tracing::debug!(base_url = %config.base_url, "Creating API client");
        Self {
            http,
            engine: RetryEngine::new(config.retry_policy),
            clock: SystemClock,
            base_url: config.base_url,
            authorization: config.authorization,
            user_agent: config.user_agent,
            cancellation: config.cancellation,
        }
    }
}

impl<H, S, C> ApiClient<H, S, C> {
    /// Replaces the sleeper used between retries.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> ApiClient<H, S2, C> {
        ApiClient {
            http: self.http,
            engine: self.engine.with_sleeper(sleeper),
            clock: self.clock,
            base_url: self.base_url,
            authorization: self.authorization,
            user_agent: self.user_agent,
            cancellation: self.cancellation,
        }
    }

    /// Replaces the clock used to resolve HTTP-date `Retry-After` values.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> ApiClient<H, S, C2> {
        ApiClient {
            http: self.http,
            engine: self.engine,
            clock,
            base_url: self.base_url,
            authorization: self.authorization,
            user_agent: self.user_agent,
            cancellation: self.cancellation,
        }
    }

    /// Returns the resolved base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the retry policy applied to every request.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        self.engine.policy()
    }

    /// Returns the client-wide cancellation token.
    ///
    /// Cancelling it aborts every current and future call for good; use
    /// [`request_with_cancellation`](Self::request_with_cancellation) to
    /// abandon a single call.
    #[must_use]
    pub const fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }
}

impl<H: HttpClient, S: Sleeper, C: Clock> ApiClient<H, S, C> {
    /// Sends `request` and decodes the JSON response body.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] once retries are exhausted, the
    /// failure is permanent, or the client is cancelled.
    pub async fn request<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.execute(request, None).await?;
        decode_json(&response)
    }

    /// Like [`request`](Self::request), but also gives up when `cancel`
    /// fires.
    ///
    /// Only this call is affected; the client stays usable.
    ///
    /// # Errors
    ///
    /// As [`request`](Self::request), plus
    /// [`ErrorKind::Cancelled`](crate::ErrorKind::Cancelled) when `cancel`
    /// fires.
    pub async fn request_with_cancellation<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<T, ApiError> {
        let response = self.execute(request, Some(cancel)).await?;
        decode_json(&response)
    }

    /// Sends `request` and returns the raw response body.
    ///
    /// # Errors
    ///
    /// As [`request`](Self::request).
    pub async fn request_bytes(&self, request: ApiRequest) -> Result<Vec<u8>, ApiError> {
        Ok(self.execute(request, None).await?.body)
    }

    /// Like [`request_bytes`](Self::request_bytes) with a per-call
    /// cancellation token.
    ///
    /// # Errors
    ///
    /// As [`request_with_cancellation`](Self::request_with_cancellation).
    pub async fn request_bytes_with_cancellation(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, ApiError> {
        Ok(self.execute(request, Some(cancel)).await?.body)
    }

    async fn execute(
        &self,
        request: ApiRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<HttpResponse, ApiError> {
        let http_request = request.into_http(&self.base_url, &self.authorization, &self.user_agent)?;
        tracing::debug!(
            method = %http_request.method,
            path = http_request.url.path(),
            "Sending API request"
        );

        // Child of the client token: fires with the client, or alone for this call
        let call = self.cancellation.child_token();
        let run = self
            .engine
            .execute_with_cancellation(move || self.attempt(http_request.clone()), &call);

        match cancel {
            None => run.await,
            Some(cancel) => {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {
                        call.cancel();
                        Err(ApiError::cancelled())
                    }
                    result = run => result,
                }
            }
        }
    }

    async fn attempt(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let response = self.http.request(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(error_from_response(&response, self.clock.now()))
        }
    }
}
