//! einvoice-client: typed client for an e-invoicing and e-signature API
//!
//! Every outbound call goes through the [`retry`] engine, which retries
//! rate-limited, server-side and network failures with exponential backoff.
//! Inbound webhook deliveries are authenticated with the [`webhook`]
//! verifier before their payload is trusted.

pub mod client;
pub mod error;
pub mod resources;
pub mod retry;
pub mod time;
pub mod transport;
pub mod webhook;

pub use client::{ApiClient, ClientConfig, ConfigError};
pub use error::{ApiError, ErrorKind};
pub use retry::{RetryEngine, RetryPolicy};
pub use webhook::{WebhookError, WebhookEvent, WebhookVerifier};
