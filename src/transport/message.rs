//! HTTP request/response values and the transport trait.

use std::time::SystemTime;

use http::header::{CONTENT_TYPE, HeaderValue, RETRY_AFTER};
use serde::Serialize;

use super::HttpError;

/// An outbound HTTP request.
///
/// This is a plain value so it can be cloned and re-sent on every retry
/// attempt without rebuilding it.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: http::Method,
    /// Fully resolved target URL, including query string
    pub url: url::Url,
    /// Headers to send
    pub headers: http::HeaderMap,
    /// Serialized body, if any
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Creates a request with no headers and no body.
    #[must_use]
    pub fn new(method: http::Method, url: url::Url) -> Self {
        Self {
            method,
            url,
            headers: http::HeaderMap::new(),
            body: None,
        }
    }

    /// Sets a raw request body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes `value` as the JSON body and sets `Content-Type`.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if `value` cannot be represented as JSON.
    pub fn with_json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_vec(value)?);
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(self)
    }

    /// Sets a header, replacing any previous values for `name`.
    #[must_use]
    pub fn with_header(mut self, name: http::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// A response with its body already read into memory.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: http::StatusCode,
    pub headers: http::HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub const fn new(status: http::StatusCode, headers: http::HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// True for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The body as text, or `None` if it is not UTF-8.
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Returns the `Retry-After` hint in whole seconds relative to `now`.
    ///
    /// See [`parse_retry_after`] for the accepted formats.
    #[must_use]
    pub fn retry_after(&self, now: SystemTime) -> Option<u64> {
        let value = self.headers.get(RETRY_AFTER)?.to_str().ok()?;
        parse_retry_after(value, now)
    }
}

/// Parses a `Retry-After` header value into seconds to wait.
///
/// Accepts either delta-seconds (`"120"`) or an HTTP-date
/// (`"Wed, 21 Oct 2015 07:28:00 GMT"`). Dates in the past, zero and
/// unparseable values all yield `None`.
#[must_use]
pub fn parse_retry_after(value: &str, now: SystemTime) -> Option<u64> {
    let value = value.trim();

    if let Ok(seconds) = value.parse::<u64>() {
        return (seconds > 0).then_some(seconds);
    }

    let at = chrono::DateTime::parse_from_rfc2822(value).ok()?;
    let now = chrono::DateTime::<chrono::Utc>::from(now);
    let wait = at.signed_duration_since(now).num_seconds();
    u64::try_from(wait).ok().filter(|s| *s > 0)
}

/// The transport seam between [`ApiClient`](crate::ApiClient) and the network.
///
/// [`ReqwestClient`](super::ReqwestClient) is the production
/// implementation; tests substitute a scripted one. Implementations buffer
/// the whole body and never interpret the status code.
///
/// ```ignore
/// use einvoice_client::transport::{HttpClient, HttpRequest, HttpResponse, HttpError};
///
/// struct Offline;
///
/// impl HttpClient for Offline {
///     async fn request(&self, _req: HttpRequest) -> Result<HttpResponse, HttpError> {
///         Err(HttpError::Timeout)
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Performs one exchange.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Connection`] if the server could not be reached,
    /// [`HttpError::Timeout`] if the per-attempt timeout elapsed and
    /// [`HttpError::InvalidUrl`] if the request could not be built.
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send;
}
