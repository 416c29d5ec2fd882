//! Electronic signature request endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DataEnvelope, ListOptions, Page, idempotency_key};
use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::time::{Clock, Sleeper};
use crate::transport::HttpClient;

/// State of a signature request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureStatus {
    Pending,
    Completed,
    Declined,
    Expired,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// A signer attached to a request, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signer {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub signed_at: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A signature request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureRequest {
    pub id: String,
    pub status: SignatureStatus,
    #[serde(default)]
    pub document_name: Option<String>,
    #[serde(default)]
    pub signers: Vec<Signer>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A signer to invite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewSigner {
    pub name: String,
    pub email: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Parameters for creating a signature request.
///
/// `document` is the base64-encoded file; alternatively pass
/// `document_url` and leave `document` empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewSignatureRequest {
    pub document_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
    pub signers: Vec<NewSigner>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Signature endpoints, obtained from [`ApiClient::signatures`].
#[derive(Debug)]
pub struct Signatures<'a, H, S, C> {
    client: &'a ApiClient<H, S, C>,
}

impl<'a, H, S, C> Signatures<'a, H, S, C> {
    pub(super) const fn new(client: &'a ApiClient<H, S, C>) -> Self {
        Self { client }
    }
}

impl<H: HttpClient, S: Sleeper, C: Clock> Signatures<'_, H, S, C> {
    /// Lists signature requests.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`].
    pub async fn list(&self, options: &ListOptions) -> Result<Page<SignatureRequest>, ApiError> {
        self.client
            .request(ApiRequest::get(["signatures"]).with_query(options.to_query()))
            .await
    }

    /// Fetches one signature request.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`].
    pub async fn get(&self, id: &str) -> Result<SignatureRequest, ApiError> {
        let envelope: DataEnvelope<SignatureRequest> =
            self.client.request(ApiRequest::get(["signatures", id])).await?;
        Ok(envelope.data)
    }

    /// Creates a signature request and invites its signers.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`]. Creating requests consumes
    /// credit, so an empty account yields
    /// [`ErrorKind::InsufficientBalance`](crate::ErrorKind::InsufficientBalance).
    pub async fn create(&self, request: &NewSignatureRequest) -> Result<SignatureRequest, ApiError> {
        let request = ApiRequest::post(["signatures"])
            .with_json(request)?
            .with_idempotency_key(idempotency_key());
        let envelope: DataEnvelope<SignatureRequest> = self.client.request(request).await?;
        Ok(envelope.data)
    }

    /// Cancels a pending signature request.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`].
    pub async fn cancel(&self, id: &str) -> Result<SignatureRequest, ApiError> {
        let request =
            ApiRequest::post(["signatures", id, "cancel"]).with_idempotency_key(idempotency_key());
        let envelope: DataEnvelope<SignatureRequest> = self.client.request(request).await?;
        Ok(envelope.data)
    }

    /// Downloads the signed document.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`].
    pub async fn download_signed(&self, id: &str) -> Result<Vec<u8>, ApiError> {
        self.client
            .request_bytes(
                ApiRequest::get(["signatures", id, "download"]).with_accept("application/pdf"),
            )
            .await
    }
}
