//! Webhook event envelope.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::WebhookError;

/// Dotted event name carried in the envelope and the `X-Webhook-Event`
/// header.
///
/// Names this crate does not know deserialize to [`Other`](Self::Other),
/// so new server-side events never break parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WebhookEventType {
    /// `invoice.created`
    InvoiceCreated,
    /// `invoice.sent`
    InvoiceSent,
    /// `invoice.paid`
    InvoicePaid,
    /// `invoice.cancelled`
    InvoiceCancelled,
    /// `invoice.failed`
    InvoiceFailed,
    /// `signature.requested`
    SignatureRequested,
    /// `signature.completed`
    SignatureCompleted,
    /// `signature.declined`
    SignatureDeclined,
    /// `signature.expired`
    SignatureExpired,
    /// Any other event name.
    Other(String),
}

impl WebhookEventType {
    /// Returns the wire name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::InvoiceCreated => "invoice.created",
            Self::InvoiceSent => "invoice.sent",
            Self::InvoicePaid => "invoice.paid",
            Self::InvoiceCancelled => "invoice.cancelled",
            Self::InvoiceFailed => "invoice.failed",
            Self::SignatureRequested => "signature.requested",
            Self::SignatureCompleted => "signature.completed",
            Self::SignatureDeclined => "signature.declined",
            Self::SignatureExpired => "signature.expired",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for WebhookEventType {
    fn from(name: &str) -> Self {
        match name {
            "invoice.created" => Self::InvoiceCreated,
            "invoice.sent" => Self::InvoiceSent,
            "invoice.paid" => Self::InvoicePaid,
            "invoice.cancelled" => Self::InvoiceCancelled,
            "invoice.failed" => Self::InvoiceFailed,
            "signature.requested" => Self::SignatureRequested,
            "signature.completed" => Self::SignatureCompleted,
            "signature.declined" => Self::SignatureDeclined,
            "signature.expired" => Self::SignatureExpired,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for WebhookEventType {
    fn from(name: String) -> Self {
        match Self::from(name.as_str()) {
            Self::Other(_) => Self::Other(name),
            known => known,
        }
    }
}

impl From<WebhookEventType> for String {
    fn from(event: WebhookEventType) -> Self {
        match event {
            WebhookEventType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The JSON body of every webhook delivery.
///
/// `data` defaults to untyped JSON; use [`WebhookEvent::from_json_as`] to
/// decode it into a concrete type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent<D = serde_json::Value> {
    /// Event name
    pub event: WebhookEventType,
    /// ISO-8601 time the event was emitted
    pub timestamp: String,
    /// Event-specific payload
    pub data: D,
}

impl WebhookEvent {
    /// Parses a raw delivery body.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Payload`] if `raw` is not a valid envelope.
    pub fn from_json(raw: &str) -> Result<Self, WebhookError> {
        Self::from_json_as(raw)
    }
}

impl<D: DeserializeOwned> WebhookEvent<D> {
    /// Parses a raw delivery body, decoding `data` as `D`.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Payload`] if `raw` is not a valid envelope or
    /// `data` does not match `D`.
    pub fn from_json_as(raw: &str) -> Result<Self, WebhookError> {
        Ok(serde_json::from_str(raw)?)
    }
}
