//! One outgoing request.

use crate::{HttpClient, HttpClientError, Response, Result};
use http::{HeaderMap, HeaderName, HeaderValue, Method, header};
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Collects a request and sends it with [`send`](Self::send).
///
/// Header, JSON and form problems are remembered and reported by `send`
/// instead of being dropped.
pub struct RequestBuilder<'a> {
    client: &'a HttpClient,
    method: Method,
    url: String,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    timeout: Option<Duration>,
    error: Option<HttpClientError>,
}

impl<'a> RequestBuilder<'a> {
    pub(crate) fn new(client: &'a HttpClient, method: Method, url: String) -> Self {
        Self {
            client,
            method,
            url,
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
            timeout: None,
            error: None,
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => self.fail(HttpClientError::Build(format!("invalid header `{}`", name))),
        }
        self
    }

    /// Append `key=value` to the query string.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// JSON body with `Content-Type: application/json`.
    pub fn json<T: Serialize>(mut self, body: &T) -> Self {
        match serde_json::to_vec(body) {
            Ok(bytes) => self.body(bytes, "application/json"),
            Err(e) => {
                self.fail(HttpClientError::Json(e.to_string()));
                self
            }
        }
    }

    /// URL-encoded form body.
    pub fn form<T: Serialize>(mut self, body: &T) -> Self {
        match serde_urlencoded::to_string(body) {
            Ok(encoded) => self.body(encoded.into_bytes(), "application/x-www-form-urlencoded"),
            Err(e) => {
                self.fail(HttpClientError::Build(format!("form body: {}", e)));
                self
            }
        }
    }

    /// Timeout for this request only.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn body(mut self, bytes: Vec<u8>, content_type: &'static str) -> Self {
        self.headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        self.body = Some(bytes);
        self
    }

    fn fail(&mut self, error: HttpClientError) {
        self.error.get_or_insert(error);
    }

    /// Absolute URLs are used as-is; anything else is joined onto the base.
    fn url(&self) -> Result<Url> {
        let invalid = |e: url::ParseError| HttpClientError::InvalidUrl(format!("{}: {}", self.url, e));
        let mut url = match self.client.base_url() {
            Some(base) if !self.url.contains("://") => {
                base.join(self.url.trim_start_matches('/')).map_err(invalid)?
            }
            _ => Url::parse(&self.url).map_err(invalid)?,
        };

        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }

    /// Send once and read the whole response.
    pub async fn send(mut self) -> Result<Response> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        let url = self.url()?;

        let mut request = self.client.prepare(self.method, url).headers(self.headers);
        if let Some(body) = self.body {
            request = request.body(body);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let request = request
            .build()
            .map_err(|e| HttpClientError::Build(e.to_string()))?;
        self.client.execute(request).await
    }
}
