// Rendering of errors that escape a controller

use crate::{Error, HttpRequest, HttpResponse};
use serde_json::json;

/// Turns an uncaught [`Error`] into a response.
///
/// Client errors always render as `{"error", "status"}` JSON. Server errors
/// render as a generic JSON 500-class body unless diagnostics are enabled,
/// in which case an HTML page with the error details is returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorRenderer {
    diagnostics: bool,
}

impl ErrorRenderer {
    pub fn new(diagnostics: bool) -> Self {
        Self { diagnostics }
    }

    pub fn diagnostics(&self) -> bool {
        self.diagnostics
    }

    pub fn render(&self, error: &Error, request: &HttpRequest) -> HttpResponse {
        let status = error.status();

        if status.is_client_error() {
            girder_log::warn!("{} {} -> {}: {}", request.method, request.uri, status.as_u16(), error);
            return json_body(status.as_u16(), &error.to_string());
        }

        girder_log::error!("{} {} failed: {}", request.method, request.uri, error);

        if self.diagnostics {
            HttpResponse::new(status.as_u16())
                .content_type("text/html; charset=utf-8")
                .with_body(diagnostic_page(error, request).into_bytes())
        } else {
            let reason = status.canonical_reason().unwrap_or("Internal Server Error");
            json_body(status.as_u16(), reason)
        }
    }
}

fn json_body(status: u16, message: &str) -> HttpResponse {
    HttpResponse::json(status, &json!({ "error": message, "status": status }))
        .unwrap_or_else(|_| HttpResponse::new(status))
}

fn diagnostic_page(error: &Error, request: &HttpRequest) -> String {
    let mut headers: Vec<_> = request.headers.iter().collect();
    headers.sort();
    let header_rows: String = headers
        .into_iter()
        .map(|(k, v)| format!("<tr><th>{}</th><td>{}</td></tr>", escape(k), escape(v)))
        .collect();

    let mut chain = String::new();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        chain.push_str(&format!("<li>{}</li>", escape(&cause.to_string())));
        source = cause.source();
    }

    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{status} {title}</title></head>\
         <body><h1>{status} {title}</h1><pre>{message}</pre><h2>Kind</h2><pre>{kind}</pre>\
         <h2>Caused by</h2><ul>{chain}</ul><h2>Request</h2><p>{method} {uri}</p>\
         <table>{headers}</table></body></html>",
        status = error.status_code(),
        title = escape(error.status().canonical_reason().unwrap_or("Error")),
        message = escape(&error.to_string()),
        kind = escape(&format!("{:?}", error)),
        chain = chain,
        method = escape(&request.method),
        uri = escape(&request.uri),
        headers = header_rows,
    )
}

fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(response: &HttpResponse) -> String {
        String::from_utf8(response.body.clone()).unwrap()
    }

    #[test]
    fn test_client_error_is_json() {
        let renderer = ErrorRenderer::new(true);
        let request = HttpRequest::new("GET", "/api");
        let response = renderer.render(&Error::InvalidRoute("/api".into()), &request);

        assert_eq!(response.status, 400);
        let value: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(value["status"], 400);
        assert!(value["error"].as_str().unwrap().contains("/api"));
    }

    #[test]
    fn test_server_error_hides_details_without_diagnostics() {
        let renderer = ErrorRenderer::default();
        let request = HttpRequest::new("GET", "/");
        let response = renderer.render(&Error::Internal("secret detail".into()), &request);

        assert_eq!(response.status, 500);
        assert!(!body(&response).contains("secret detail"));
        assert!(body(&response).contains("Internal Server Error"));
    }

    #[test]
    fn test_diagnostic_page_escapes_message() {
        let renderer = ErrorRenderer::new(true);
        let request = HttpRequest::new("GET", "/");
        let response = renderer.render(&Error::Internal("<script>".into()), &request);

        assert_eq!(response.status, 500);
        assert_eq!(
            response.headers.get("Content-Type").map(String::as_str),
            Some("text/html; charset=utf-8")
        );
        assert!(body(&response).contains("&lt;script&gt;"));
        assert!(!body(&response).contains("<script>"));
    }
}
