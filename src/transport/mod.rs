//! HTTP transport layer.
//!
//! This module provides:
//! - Request/response values ([`HttpRequest`], [`HttpResponse`])
//! - The injectable transport trait ([`HttpClient`])
//! - The production implementation ([`ReqwestClient`])
//! - `Retry-After` parsing ([`parse_retry_after`])

mod client;
mod error;
mod message;

#[cfg(test)]
pub(crate) mod mock;

pub use client::ReqwestClient;
pub use error::HttpError;
pub use message::{HttpClient, HttpRequest, HttpResponse, parse_retry_after};
