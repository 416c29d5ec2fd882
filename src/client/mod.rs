//! API client, configuration and request plumbing.
//!
//! [`ApiClient`] combines a [`HttpClient`](crate::transport::HttpClient)
//! transport with the [`RetryEngine`](crate::RetryEngine); resource
//! wrappers in [`crate::resources`] build [`ApiRequest`]s on top of it.

mod api;
mod config;
pub mod defaults;
mod error;
mod request;
pub mod response;


pub use api::ApiClient;
pub use config::{ClientConfig, ValidatedConfig};
pub use error::ConfigError;
pub use request::{ApiRequest, IDEMPOTENCY_KEY_HEADER};
