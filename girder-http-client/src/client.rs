//! The shared client.

use crate::{HttpClientConfig, HttpClientError, RequestBuilder, Response, Result};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Outbound HTTP client. Clones share one connection pool.
///
/// Each request is sent once with no retry. The configured timeout applies
/// unless the request sets its own.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    base_url: Option<Arc<Url>>,
    config: Arc<HttpClientConfig>,
}

impl HttpClient {
    /// Build the client, checking the base URL and default headers.
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let base_url = config.base_url.as_deref().map(parse_base).transpose()?;

        let mut headers = HeaderMap::new();
        for (name, value) in &config.default_headers {
            let name = HeaderName::try_from(name.as_str())
                .map_err(|e| HttpClientError::Build(format!("header `{}`: {}", name, e)))?;
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|e| HttpClientError::Build(format!("header `{}`: {}", name, e)))?;
            headers.insert(name, value);
        }

        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .gzip(true)
            .build()
            .map_err(|e| HttpClientError::Build(e.to_string()))?;

        Ok(Self {
            inner,
            base_url: base_url.map(Arc::new),
            config: Arc::new(config),
        })
    }

    /// Settings the client was built with.
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Parsed base URL, always ending in `/`.
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_deref()
    }

    pub fn get(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        self.request(Method::GET, url)
    }

    pub fn post(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        self.request(Method::POST, url)
    }

    pub fn put(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        self.request(Method::PUT, url)
    }

    pub fn delete(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        self.request(Method::DELETE, url)
    }

    /// Request with any method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, method, url.into())
    }

    pub(crate) fn prepare(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.inner.request(method, url)
    }

    pub(crate) async fn execute(&self, request: reqwest::Request) -> Result<Response> {
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "Sending request");

        let response = self
            .inner
            .execute(request)
            .await
            .map_err(HttpClientError::from_transport)?;

        debug!(%method, %url, status = %response.status(), "Received response");
        Response::read(response).await
    }
}

fn parse_base(base: &str) -> Result<Url> {
    let base = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    };
    Url::parse(&base).map_err(|e| HttpClientError::InvalidUrl(format!("{}: {}", base, e)))
}
