//! Mapping HTTP responses to results.

use std::collections::BTreeMap;
use std::time::SystemTime;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, ErrorKind};
use crate::transport::HttpResponse;

/// Decodes a successful JSON response body.
///
/// An empty body decodes as JSON `null`, so endpoints answering
/// `204 No Content` work with `T = ()` or `Option<_>`.
///
/// # Errors
///
/// Returns an [`ErrorKind::Unknown`] error carrying the status if the body
/// does not match `T`.
pub fn decode_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &response.body
    };

    serde_json::from_slice(body).map_err(|e| {
        ApiError::new(ErrorKind::Unknown, format!("unexpected response body: {e}"))
            .with_status(response.status)
            .with_source(e)
    })
}

/// Builds the error for a non-2xx response.
///
/// Understands the API's error bodies:
///
/// ```json
/// {"message": "...", "errors": {"field": ["msg", ...]}}
/// {"error": "..."}
/// {"error": {"message": "...", "details": {...}}}
/// ```
///
/// Bodies that are not JSON fall back to the status reason phrase.
#[must_use]
pub fn error_from_response(response: &HttpResponse, now: SystemTime) -> ApiError {
    let kind = ErrorKind::from_status(response.status);
    let body: Option<Value> = serde_json::from_slice(&response.body).ok();

    let message = body
        .as_ref()
        .and_then(extract_message)
        .or_else(|| {
            // Non-JSON bodies are usually a proxy's plain-text page
            body.is_none()
                .then(|| response.body_text())
                .flatten()
                .map(str::trim)
                .filter(|text| !text.is_empty() && text.len() <= 200)
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            response
                .status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    let mut err = ApiError::new(kind, message)
        .with_status(response.status)
        .with_retry_after(response.retry_after(now));

    if let Some(body) = body {
        let fields = extract_field_errors(&body);
        if !fields.is_empty() {
            err = err.with_field_errors(fields);
        }
        err = err.with_details(body);
    }

    err
}

fn extract_message(body: &Value) -> Option<String> {
    let text = body
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| match body.get("error")? {
            Value::String(s) => Some(s.as_str()),
            Value::Object(obj) => obj.get("message").and_then(Value::as_str),
            _ => None,
        })?;
    Some(text.to_string())
}

fn extract_field_errors(body: &Value) -> BTreeMap<String, Vec<String>> {
    let errors = body
        .get("errors")
        .or_else(|| body.get("error").and_then(|e| e.get("errors")));

    let Some(Value::Object(map)) = errors else {
        return BTreeMap::new();
    };

    map.iter()
        .filter_map(|(field, value)| {
            let messages: Vec<String> = match value {
                Value::String(s) => vec![s.clone()],
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
                _ => return None,
            };
            (!messages.is_empty()).then(|| (field.clone(), messages))
        })
        .collect()
}
