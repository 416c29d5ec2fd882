//! Webhook signature verification.
//!
//! This module provides:
//! - The signature header format ([`SignatureHeader`])
//! - The event envelope ([`WebhookEvent`], [`WebhookEventType`])
//! - Injectable HMAC and delivery-id primitives ([`MessageSigner`], [`DeliveryIdSource`])
//! - Verification and test-event construction ([`WebhookVerifier`])

mod error;
mod event;
mod header;
mod signer;
mod verifier;

#[cfg(test)]
mod event_tests;
#[cfg(test)]
mod header_tests;

pub use error::WebhookError;
pub use event::{WebhookEvent, WebhookEventType};
pub use header::{
    DELIVERY_HEADER, EVENT_HEADER, SIGNATURE_HEADER, SignatureHeader, SignatureHeaderError,
};
pub use signer::{
    DeliveryIdSource, HmacSha256Signer, MessageSigner, UuidDeliveryIds, constant_time_eq,
};
pub use verifier::{TestEvent, WebhookVerifier};
