//! In-memory `HttpClient` for unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use spoiler_domain::request::RequestSpec;
use spoiler_domain::response::ResponseSpec;

use crate::ports::{HttpClient, HttpClientError};

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub struct MockHttpClient {
    responses: Mutex<VecDeque<Result<ResponseSpec, HttpClientError>>>,
    requests: Mutex<Vec<RequestSpec>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        self.responses.lock().unwrap().push_back(Ok(ResponseSpec::new(
            status,
            headers,
            body.as_bytes(),
            Duration::from_millis(5),
        )));
        self
    }

    pub fn fail(self, error: HttpClientError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<RequestSpec> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for MockHttpClient {
    async fn execute(&self, request: &RequestSpec) -> Result<ResponseSpec, HttpClientError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(HttpClientError::Other("no response queued".to_string())))
    }
}
