//! Invoice endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DataEnvelope, ListOptions, Page, idempotency_key};
use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::time::{Clock, Sleeper};
use crate::transport::HttpClient;

/// Lifecycle state of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Pending,
    Sent,
    Delivered,
    Paid,
    Cancelled,
    Failed,
    /// A state this client does not know yet
    #[serde(other)]
    Unknown,
}

/// A buyer or seller on an invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A single invoice line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// An invoice as returned by the API.
///
/// Fields the client does not model are preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub status: InvoiceStatus,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub customer: Option<Party>,
    #[serde(default)]
    pub lines: Vec<InvoiceLine>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Parameters for creating an invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewInvoice {
    pub customer: Party,
    pub lines: Vec<InvoiceLine>,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Invoice endpoints, obtained from [`ApiClient::invoices`].
#[derive(Debug)]
pub struct Invoices<'a, H, S, C> {
    client: &'a ApiClient<H, S, C>,
}

impl<'a, H, S, C> Invoices<'a, H, S, C> {
    pub(super) const fn new(client: &'a ApiClient<H, S, C>) -> Self {
        Self { client }
    }
}

impl<H: HttpClient, S: Sleeper, C: Clock> Invoices<'_, H, S, C> {
    /// Lists invoices.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`].
    pub async fn list(&self, options: &ListOptions) -> Result<Page<Invoice>, ApiError> {
        self.client
            .request(ApiRequest::get(["invoices"]).with_query(options.to_query()))
            .await
    }

    /// Fetches one invoice.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`]; a missing invoice is
    /// [`ErrorKind::NotFound`](crate::ErrorKind::NotFound).
    pub async fn get(&self, id: &str) -> Result<Invoice, ApiError> {
        let envelope: DataEnvelope<Invoice> =
            self.client.request(ApiRequest::get(["invoices", id])).await?;
        Ok(envelope.data)
    }

    /// Creates an invoice.
    ///
    /// A fresh idempotency key is attached so that retries after an
    /// ambiguous failure cannot create duplicates.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`]; rejected input is
    /// [`ErrorKind::Validation`](crate::ErrorKind::Validation) with
    /// per-field messages.
    pub async fn create(&self, invoice: &NewInvoice) -> Result<Invoice, ApiError> {
        let request = ApiRequest::post(["invoices"])
            .with_json(invoice)?
            .with_idempotency_key(idempotency_key());
        let envelope: DataEnvelope<Invoice> = self.client.request(request).await?;
        Ok(envelope.data)
    }

    /// Submits an invoice for delivery to its recipient.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`].
    pub async fn send(&self, id: &str) -> Result<Invoice, ApiError> {
        self.action(id, "send").await
    }

    /// Cancels an invoice.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`].
    pub async fn cancel(&self, id: &str) -> Result<Invoice, ApiError> {
        self.action(id, "cancel").await
    }

    /// Downloads the rendered PDF.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`].
    pub async fn download_pdf(&self, id: &str) -> Result<Vec<u8>, ApiError> {
        self.client
            .request_bytes(ApiRequest::get(["invoices", id, "pdf"]).with_accept("application/pdf"))
            .await
    }

    async fn action(&self, id: &str, action: &str) -> Result<Invoice, ApiError> {
        let request = ApiRequest::post(["invoices", id, action]).with_idempotency_key(idempotency_key());
        let envelope: DataEnvelope<Invoice> = self.client.request(request).await?;
        Ok(envelope.data)
    }
}
