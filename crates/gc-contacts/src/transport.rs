//! HTTP transport abstraction
//!
//! The gateway only needs one primitive: send a JSON request and hand back
//! status and body. Status codes are never turned into errors here; only
//! failures to complete the exchange are.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::debug;

use crate::error::{ContactsError, Result};

/// Outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub json_body: Option<Value>,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Response as seen by the gateway
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// Explicit success flag, when the transport decides one
    pub ok: Option<bool>,
    /// Parsed body, when it was valid JSON
    pub json: Option<Value>,
    /// Body text as received
    pub raw: Option<String>,
}

impl HttpResponse {
    /// Build a response from a status and body text, parsing JSON if possible
    pub fn from_body(status: u16, body: impl Into<String>) -> Self {
        let raw = body.into();
        let json = if raw.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&raw).ok()
        };
        Self {
            status,
            ok: None,
            json,
            raw: Some(raw),
        }
    }
}

/// Executes JSON HTTP calls
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// [`HttpTransport`] backed by reqwest
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with a per-request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ContactsError::Configuration(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.client.request(request.method.clone(), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(ref body) = request.json_body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ContactsError::Connection(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ContactsError::HttpError(e.to_string()))?;

        debug!("{} {} -> {}", request.method, request.url, status);
        Ok(HttpResponse::from_body(status, text))
    }
}
