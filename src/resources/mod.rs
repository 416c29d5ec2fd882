//! Typed wrappers over the API's resource endpoints.
//!
//! Each wrapper borrows an [`ApiClient`] and turns method calls into
//! [`ApiRequest`]s; all retry and error handling lives in the client.
//!
//! List endpoints return a [`Page`]; single resources arrive wrapped in a
//! [`DataEnvelope`] which the wrappers strip.

mod companies;
mod invoices;
mod signatures;

#[cfg(test)]
mod resources_tests;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::client::ApiClient;

pub use companies::{Companies, Company};
pub use invoices::{Invoice, InvoiceLine, InvoiceStatus, Invoices, NewInvoice, Party};
pub use signatures::{
    NewSignatureRequest, NewSigner, SignatureRequest, SignatureStatus, Signatures, Signer,
};

/// Pagination, sorting and filtering for list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// 1-based page number
    pub page: Option<u32>,
    /// Items per page
    pub per_page: Option<u32>,
    /// Sort expression, e.g. `-created_at`
    pub sort: Option<String>,
    /// Extra filters sent as `filter[key]=value`
    pub filters: BTreeMap<String, String>,
}

impl ListOptions {
    /// Creates empty options (server defaults apply).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a specific page.
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Sets the sort expression.
    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Adds a filter.
    #[must_use]
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Returns the query pairs for these options.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page".to_string(), per_page.to_string()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort".to_string(), sort.clone()));
        }
        for (key, value) in &self.filters {
            pairs.push((format!("filter[{key}]"), value.clone()));
        }
        pairs
    }
}

/// Pagination metadata returned alongside list results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Page this response holds
    #[serde(default)]
    pub current_page: u32,
    /// Items per page
    #[serde(default)]
    pub per_page: u32,
    /// Total number of items across all pages
    #[serde(default)]
    pub total: u64,
    /// Number of the last page
    #[serde(default)]
    pub last_page: u32,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    pub data: Vec<T>,
    /// Pagination metadata
    #[serde(default)]
    pub meta: PageMeta,
}

impl<T> Page<T> {
    /// Returns true if a later page exists.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.meta.current_page < self.meta.last_page
    }

    /// Returns the options for fetching the next page, if there is one.
    #[must_use]
    pub fn next_page_options(&self, current: &ListOptions) -> Option<ListOptions> {
        self.has_next_page()
            .then(|| current.clone().with_page(self.meta.current_page + 1))
    }
}

/// Wrapper around single-resource responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    /// The resource
    pub data: T,
}

impl<H, S, C> ApiClient<H, S, C> {
    /// Invoice endpoints.
    #[must_use]
    pub const fn invoices(&self) -> Invoices<'_, H, S, C> {
        Invoices::new(self)
    }

    /// Signature request endpoints.
    #[must_use]
    pub const fn signatures(&self) -> Signatures<'_, H, S, C> {
        Signatures::new(self)
    }

    /// Company endpoints.
    #[must_use]
    pub const fn companies(&self) -> Companies<'_, H, S, C> {
        Companies::new(self)
    }
}

fn idempotency_key() -> String {
    uuid::Uuid::new_v4().to_string()
}
