//! Scripted transport for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Mock HTTP client that replays a scripted sequence of results and
/// records every request it receives.
///
/// Clones share the script and the request log.
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    responses: Arc<Mutex<VecDeque<Result<HttpResponse, HttpError>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockClient {
    pub fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            requests: Arc::default(),
        }
    }

    /// A single response with the given status and JSON body.
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self::new(vec![Ok(response(status, body))])
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests.lock().unwrap().last().cloned().expect("no request captured")
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(req);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("mock ran out of scripted responses")
    }
}

/// Builds a response with a JSON body.
pub fn response(status: u16, body: &serde_json::Value) -> HttpResponse {
    HttpResponse::new(
        http::StatusCode::from_u16(status).unwrap(),
        http::HeaderMap::new(),
        serde_json::to_vec(body).unwrap(),
    )
}

/// Builds a response with the given headers and raw body.
pub fn response_with(status: u16, headers: &[(&'static str, &str)], body: &[u8]) -> HttpResponse {
    let mut map = http::HeaderMap::new();
    for (name, value) in headers {
        map.insert(*name, http::HeaderValue::from_str(value).unwrap());
    }
    HttpResponse::new(http::StatusCode::from_u16(status).unwrap(), map, body.to_vec())
}
