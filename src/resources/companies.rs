//! Company endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DataEnvelope, ListOptions, Page};
use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::time::{Clock, Sleeper};
use crate::transport::HttpClient;

/// A company registered on the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Company endpoints, obtained from [`ApiClient::companies`].
#[derive(Debug)]
pub struct Companies<'a, H, S, C> {
    client: &'a ApiClient<H, S, C>,
}

impl<'a, H, S, C> Companies<'a, H, S, C> {
    pub(super) const fn new(client: &'a ApiClient<H, S, C>) -> Self {
        Self { client }
    }
}

impl<H: HttpClient, S: Sleeper, C: Clock> Companies<'_, H, S, C> {
    /// Lists companies.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`].
    pub async fn list(&self, options: &ListOptions) -> Result<Page<Company>, ApiError> {
        self.client
            .request(ApiRequest::get(["companies"]).with_query(options.to_query()))
            .await
    }

    /// Fetches one company.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`].
    pub async fn get(&self, id: &str) -> Result<Company, ApiError> {
        let envelope: DataEnvelope<Company> =
            self.client.request(ApiRequest::get(["companies", id])).await?;
        Ok(envelope.data)
    }
}
