//! Endpoint-relative request descriptions.

use http::header::{ACCEPT, AUTHORIZATION, HeaderName, HeaderValue, USER_AGENT};
use serde::Serialize;
use url::Url;

use crate::error::{ApiError, ErrorKind};
use crate::transport::HttpRequest;

/// Header carrying the idempotency key on mutating requests.
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// A request relative to the client's base URL.
///
/// Path segments are percent-encoded individually, so identifiers taken
/// from user input can never escape their segment.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: http::Method,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
    accept: &'static str,
    idempotency_key: Option<String>,
}

impl ApiRequest {
    /// Creates a request for `method` on the given path segments.
    #[must_use]
    pub fn new<I, S>(method: http::Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
            accept: "application/json",
            idempotency_key: None,
        }
    }

    /// Shorthand for a `GET` request.
    #[must_use]
    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(http::Method::GET, segments)
    }

    /// Shorthand for a `POST` request.
    #[must_use]
    pub fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(http::Method::POST, segments)
    }

    /// Appends query parameters.
    #[must_use]
    pub fn with_query(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Serializes `body` as the JSON request body.
    ///
    /// # Errors
    ///
    /// Returns a [`ErrorKind::Validation`] error if `body` cannot be
    /// represented as JSON.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| {
            ApiError::new(ErrorKind::Validation, "request body is not valid JSON").with_source(e)
        })?;
        self.body = Some(value);
        Ok(self)
    }

    /// Sets the `Accept` header (defaults to `application/json`).
    #[must_use]
    pub const fn with_accept(mut self, accept: &'static str) -> Self {
        self.accept = accept;
        self
    }

    /// Attaches an idempotency key so retried writes are applied once.
    #[must_use]
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> &http::Method {
        &self.method
    }

    /// Returns the idempotency key, if any.
    #[must_use]
    pub fn idempotency_key(&self) -> Option<&str> {
        self.idempotency_key.as_deref()
    }

    /// Resolves this request against `base` into a transport request.
    ///
    /// # Errors
    ///
    /// Returns a [`ErrorKind::Validation`] error if the base URL cannot
    /// carry path segments or the idempotency key is not a valid header.
    pub fn into_http(
        self,
        base: &Url,
        authorization: &HeaderValue,
        user_agent: &HeaderValue,
    ) -> Result<HttpRequest, ApiError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::new(ErrorKind::Validation, "base URL cannot be a base"))?
            .pop_if_empty()
            .extend(&self.segments);

        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }

        let mut req = HttpRequest::new(self.method, url)
            .with_header(AUTHORIZATION, authorization.clone())
            .with_header(USER_AGENT, user_agent.clone())
            .with_header(ACCEPT, HeaderValue::from_static(self.accept));

        if let Some(key) = self.idempotency_key {
            let value = HeaderValue::from_str(&key).map_err(|e| {
                ApiError::new(ErrorKind::Validation, "invalid idempotency key").with_source(e)
            })?;
            req = req.with_header(HeaderName::from_static(IDEMPOTENCY_KEY_HEADER), value);
        }

        if let Some(body) = self.body {
            req = req.with_json(&body).map_err(|e| {
                ApiError::new(ErrorKind::Validation, "request body is not valid JSON")
                    .with_source(e)
            })?;
        }

        Ok(req)
    }
}
