//! The `t=<seconds>,v1=<hex>` signature header.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// Header names are stored lowercase, as `http::HeaderMap` requires for
// static names; lookups are case-insensitive.

/// `X-Webhook-Signature`: the `t=...,v1=...` signature.
pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// `X-Webhook-Event`: the dotted event name.
pub const EVENT_HEADER: &str = "x-webhook-event";

/// `X-Webhook-Delivery`: a unique delivery identifier.
pub const DELIVERY_HEADER: &str = "x-webhook-delivery";

/// Why a signature header could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureHeaderError {
    /// No `t=` pair was present.
    #[error("missing timestamp")]
    MissingTimestamp,

    /// No `v1=` pair was present.
    #[error("missing v1 signature")]
    MissingSignature,

    /// The `t=` value is not a canonical decimal integer.
    #[error("timestamp '{0}' is not a canonical integer")]
    InvalidTimestamp(String),
}

/// Parsed form of the signature header.
///
/// Pairs are comma separated and may appear in any order. Unknown keys are
/// ignored and the first occurrence of a repeated key wins.
///
/// The timestamp must be written canonically (no `+` sign, no leading
/// zeros), so the signed `"{t}.{payload}"` message always uses the digits
/// exactly as they appeared on the wire.
///
/// # Example
///
/// ```
/// use einvoice_client::webhook::SignatureHeader;
///
/// let header: SignatureHeader = "v1=abc123,t=1700000000".parse().unwrap();
/// assert_eq!(header.timestamp, 1_700_000_000);
/// assert_eq!(header.to_string(), "t=1700000000,v1=abc123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Signing time in seconds since the Unix epoch.
    pub timestamp: i64,
    /// Lowercase hex HMAC-SHA256.
    pub signature: String,
}

impl SignatureHeader {
    /// Creates a header from its parts.
    #[must_use]
    pub fn new(timestamp: i64, signature: impl Into<String>) -> Self {
        Self {
            timestamp,
            signature: signature.into(),
        }
    }
}

impl FromStr for SignatureHeader {
    type Err = SignatureHeaderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut timestamp = None;
        let mut signature = None;

        for pair in value.split(',') {
            let Some((key, val)) = pair.trim().split_once('=') else {
                continue;
            };
            match key.trim() {
                "t" if timestamp.is_none() => timestamp = Some(val.trim()),
                "v1" if signature.is_none() => signature = Some(val.trim()),
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or(SignatureHeaderError::MissingTimestamp)?;
        let signature = signature.ok_or(SignatureHeaderError::MissingSignature)?;
        let invalid = || SignatureHeaderError::InvalidTimestamp(timestamp.to_string());
        let parsed = timestamp.parse::<i64>().map_err(|_| invalid())?;
        if parsed.to_string() != timestamp {
            return Err(invalid());
        }

        Ok(Self::new(parsed, signature))
    }
}

impl fmt::Display for SignatureHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={},v1={}", self.timestamp, self.signature)
    }
}
