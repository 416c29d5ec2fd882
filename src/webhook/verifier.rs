//! Webhook signature verification and test-event construction.

use chrono::{DateTime, SecondsFormat, Utc};
use http::header::{CONTENT_TYPE, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::header::{DELIVERY_HEADER, EVENT_HEADER, SIGNATURE_HEADER, SignatureHeaderError};
use super::signer::{
    DeliveryIdSource, HmacSha256Signer, MessageSigner, UuidDeliveryIds, constant_time_eq,
};
use super::{SignatureHeader, WebhookError, WebhookEvent, WebhookEventType};
use crate::time::{Clock, SystemClock, unix_seconds};

/// Internal reason a delivery was rejected.
///
/// Only ever logged; callers see a plain `false`.
#[derive(Debug, Error)]
enum Rejection {
    #[error("malformed signature header: {0}")]
    MalformedHeader(#[from] SignatureHeaderError),

    #[error("timestamp outside tolerance (age {age_secs}s, tolerance {tolerance_secs}s)")]
    OutsideTolerance { age_secs: u64, tolerance_secs: u64 },

    #[error("signature mismatch")]
    SignatureMismatch,
}

/// A signed delivery built by [`WebhookVerifier::construct_test_event`].
#[derive(Debug, Clone)]
pub struct TestEvent {
    /// Serialized envelope, exactly as it was signed
    pub payload: String,
    /// Signature, event, delivery and content-type headers
    pub headers: http::HeaderMap,
}

/// Verifies inbound webhook signatures.
///
/// The signed message is `"{timestamp}.{raw_payload}"`, keyed with the
/// shared secret. Verification is a pure function of its inputs and the
/// clock; the verifier keeps no state between calls and never stores the
/// secret.
///
/// # Type Parameters
///
/// - `C`: Clock used for the tolerance window (defaults to [`SystemClock`])
/// - `M`: HMAC implementation (defaults to [`HmacSha256Signer`])
/// - `I`: Delivery id source for test events (defaults to [`UuidDeliveryIds`])
///
/// # Example
///
/// ```
/// use einvoice_client::WebhookVerifier;
/// use einvoice_client::webhook::SIGNATURE_HEADER;
///
/// let verifier = WebhookVerifier::new();
/// let event = verifier
///     .construct_test_event("invoice.paid", serde_json::json!({"id": "inv_1"}), "whsec_test")
///     .unwrap();
/// let header = event.headers[SIGNATURE_HEADER].to_str().unwrap();
///
/// assert!(verifier.verify(&event.payload, header, "whsec_test"));
/// assert!(!verifier.verify(&event.payload, header, "whsec_other"));
/// ```
#[derive(Debug, Clone)]
pub struct WebhookVerifier<C = SystemClock, M = HmacSha256Signer, I = UuidDeliveryIds> {
    clock: C,
    signer: M,
    ids: I,
    tolerance_secs: u64,
}

impl WebhookVerifier {
    /// Default tolerance window in seconds, applied in both directions.
    pub const DEFAULT_TOLERANCE_SECS: u64 = 300;

    /// Creates a verifier using the system clock, HMAC-SHA256 and UUIDs.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clock: SystemClock,
            signer: HmacSha256Signer,
            ids: UuidDeliveryIds,
            tolerance_secs: Self::DEFAULT_TOLERANCE_SECS,
        }
    }
}

impl Default for WebhookVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, M, I> WebhookVerifier<C, M, I> {
    /// Replaces the clock.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> WebhookVerifier<C2, M, I> {
        WebhookVerifier {
            clock,
            signer: self.signer,
            ids: self.ids,
            tolerance_secs: self.tolerance_secs,
        }
    }

    /// Replaces the HMAC implementation.
    #[must_use]
    pub fn with_signer<M2>(self, signer: M2) -> WebhookVerifier<C, M2, I> {
        WebhookVerifier {
            clock: self.clock,
            signer,
            ids: self.ids,
            tolerance_secs: self.tolerance_secs,
        }
    }

    /// Replaces the delivery id source.
    #[must_use]
    pub fn with_delivery_ids<I2>(self, ids: I2) -> WebhookVerifier<C, M, I2> {
        WebhookVerifier {
            clock: self.clock,
            signer: self.signer,
            ids,
            tolerance_secs: self.tolerance_secs,
        }
    }

    /// Sets the default tolerance window used by [`verify`](Self::verify).
    #[must_use]
    pub const fn with_tolerance_secs(mut self, tolerance_secs: u64) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    /// Returns the default tolerance window in seconds.
    #[must_use]
    pub const fn tolerance_secs(&self) -> u64 {
        self.tolerance_secs
    }
}

impl<C: Clock, M: MessageSigner, I: DeliveryIdSource> WebhookVerifier<C, M, I> {
    /// Returns true if `header_value` is a valid, fresh signature of
    /// `raw_payload` under `secret`.
    #[must_use]
    pub fn verify(&self, raw_payload: &str, header_value: &str, secret: &str) -> bool {
        self.verify_with_tolerance(raw_payload, header_value, secret, self.tolerance_secs)
    }

    /// Like [`verify`](Self::verify) with an explicit tolerance window.
    ///
    /// Malformed headers, stale or future timestamps and mismatched
    /// signatures all yield `false`.
    #[must_use]
    pub fn verify_with_tolerance(
        &self,
        raw_payload: &str,
        header_value: &str,
        secret: &str,
        tolerance_secs: u64,
    ) -> bool {
        match self.check(raw_payload, header_value, secret, tolerance_secs) {
            Ok(()) => true,
            Err(reason) => {
                tracing::debug!(%reason, "Rejected webhook delivery");
                false
            }
        }
    }

    fn check(
        &self,
        raw_payload: &str,
        header_value: &str,
        secret: &str,
        tolerance_secs: u64,
    ) -> Result<(), Rejection> {
        let header: SignatureHeader = header_value.parse()?;

        let age_secs = self.clock.unix_seconds().abs_diff(header.timestamp);
        if age_secs > tolerance_secs {
            return Err(Rejection::OutsideTolerance {
                age_secs,
                tolerance_secs,
            });
        }

        let expected = self.signature_for(raw_payload, secret, header.timestamp);
        if constant_time_eq(expected.as_bytes(), header.signature.as_bytes()) {
            Ok(())
        } else {
            Err(Rejection::SignatureMismatch)
        }
    }

    /// Verifies the delivery, then parses its envelope.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::InvalidSignature`] if verification fails and
    /// [`WebhookError::Payload`] if the verified body is malformed.
    pub fn verify_and_parse<D: DeserializeOwned>(
        &self,
        raw_payload: &str,
        header_value: &str,
        secret: &str,
    ) -> Result<WebhookEvent<D>, WebhookError> {
        if !self.verify(raw_payload, header_value, secret) {
            return Err(WebhookError::InvalidSignature);
        }
        WebhookEvent::from_json_as(raw_payload)
    }

    /// Parses a raw delivery body into an untyped envelope.
    ///
    /// Call only after [`verify`](Self::verify) has succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Payload`] for malformed input.
    #[allow(clippy::unused_self)]
    pub fn parse_payload(&self, raw: &str) -> Result<WebhookEvent, WebhookError> {
        WebhookEvent::from_json(raw)
    }

    /// Signs `raw_payload` as if it had been sent at `timestamp`.
    #[must_use]
    pub fn sign(&self, raw_payload: &str, secret: &str, timestamp: i64) -> SignatureHeader {
        SignatureHeader::new(timestamp, self.signature_for(raw_payload, secret, timestamp))
    }

    /// Builds a signed delivery stamped with the current time.
    ///
    /// This holds the same power as the real sender. Use it for local
    /// integration tests only, never on a path reachable by untrusted input.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Payload`] if `data` cannot be serialized and
    /// [`WebhookError::HeaderValue`] if the event name is not a valid header
    /// value.
    pub fn construct_test_event<D: Serialize>(
        &self,
        event: impl Into<WebhookEventType>,
        data: D,
        secret: &str,
    ) -> Result<TestEvent, WebhookError> {
        // One clock read, so the envelope and `t=` name the same second
        let now = self.clock.now();
        let envelope = WebhookEvent {
            event: event.into(),
            timestamp: DateTime::<Utc>::from(now).to_rfc3339_opts(SecondsFormat::Millis, true),
            data,
        };
        let payload = serde_json::to_string(&envelope)?;
        let signature = self.sign(&payload, secret, unix_seconds(now));

        let mut headers = http::HeaderMap::new();
        headers.insert(
            SIGNATURE_HEADER,
            HeaderValue::from_str(&signature.to_string())?,
        );
        headers.insert(EVENT_HEADER, HeaderValue::from_str(envelope.event.as_str())?);
        headers.insert(DELIVERY_HEADER, HeaderValue::from_str(&self.ids.next_id())?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(TestEvent { payload, headers })
    }

    fn signature_for(&self, raw_payload: &str, secret: &str, timestamp: i64) -> String {
        let message = format!("{timestamp}.{raw_payload}");
        self.signer.sign_hex(secret.as_bytes(), message.as_bytes())
    }
}
