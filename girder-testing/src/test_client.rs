// Test HTTP Client

use girder_core::{Dispatcher, HttpRequest, HttpResponse};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Drives a [`Dispatcher`] in-process, without a socket.
#[derive(Clone)]
pub struct TestClient {
    dispatcher: Arc<Dispatcher>,
}

impl TestClient {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(HttpRequest::new("GET", uri)).await
    }

    pub async fn post_json<T: Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        self.request(json_request("POST", uri, body)).await
    }

    pub async fn put_json<T: Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        self.request(json_request("PUT", uri, body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(HttpRequest::new("DELETE", uri)).await
    }

    /// Dispatch a hand-built request.
    pub async fn request(&self, request: HttpRequest) -> TestResponse {
        TestResponse(self.dispatcher.dispatch(request).await)
    }
}

fn json_request<T: Serialize>(method: &str, uri: &str, body: &T) -> HttpRequest {
    let body = serde_json::to_vec(body).unwrap_or_else(|e| panic!("serializing test body: {}", e));
    HttpRequest::new(method, uri)
        .with_header("Content-Type", "application/json")
        .with_body(body)
}

/// Response from a test request
#[derive(Debug, Clone)]
pub struct TestResponse(pub HttpResponse);

impl TestResponse {
    pub fn status(&self) -> u16 {
        self.0.status
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.body).into_owned()
    }

    /// Body as JSON; panics with the raw body when it does not parse.
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.0.body)
            .unwrap_or_else(|e| panic!("response is not JSON ({}): {}", e, self.text()))
    }

    /// Header value, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.0
            .headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Panics with the body when the status differs.
    #[track_caller]
    pub fn assert_status(&self, expected: u16) -> &Self {
        assert_eq!(
            self.status(),
            expected,
            "unexpected status, body: {}",
            self.text()
        );
        self
    }

    pub fn into_inner(self) -> HttpResponse {
        self.0
    }
}
