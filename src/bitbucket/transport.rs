//! Transport seam between the request executor and the network.
//!
//! The executor only needs one capability: send a fully-formed request and
//! get back the status, final URL and body text. Keeping that behind a trait
//! lets the executor and traversal be exercised without a network.

use async_trait::async_trait;
use http::{HeaderMap, Method, StatusCode};
use url::Url;

use super::error::PipeError;

/// A fully resolved outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute request URL.
    pub url: Url,
    /// Final header set after defaults and overrides are merged.
    pub headers: HeaderMap,
    /// Optional request body, sent as-is.
    pub body: Option<String>,
}

/// The parts of a response the executor inspects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// URL the response was served from (after redirects).
    pub url: Url,
    /// Full body text.
    pub body: String,
}

/// Capability to perform exactly one HTTP exchange.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends the request and reads the whole body.
    ///
    /// # Errors
    ///
    /// Returns [`PipeError::Network`] when no response could be obtained.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, PipeError>;
}

/// [`HttpTransport`] backed by a `reqwest` client with default settings.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Wraps an existing `reqwest` client.
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, PipeError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.client.request(method, url).headers(headers);
        if let Some(payload) = body {
            builder = builder.body(payload);
        }

        let response = builder.send().await.map_err(|error| PipeError::Network {
            message: error.to_string(),
        })?;

        let status = response.status();
        let final_url = response.url().clone();
        let text = response.text().await.map_err(|error| PipeError::Network {
            message: format!("failed to read response body: {error}"),
        })?;

        Ok(HttpResponse {
            status,
            url: final_url,
            body: text,
        })
    }
}
