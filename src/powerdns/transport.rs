//! The raw HTTP seam: send a method, path and optional JSON body, get back a status and bytes.
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use tracing::debug;

use crate::config::{ClientConfig, DEFAULT_USER_AGENT};
use crate::error::ApiError;

/// Status and body of a completed request, whatever the status class.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Authenticated JSON-over-HTTP access to a PowerDNS API root.
///
/// Non-2xx statuses come back as `Ok`; `Err` means the request itself failed
/// (connect, timeout, body read).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<RawResponse, ApiError>;
}

#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: String, // e.g. "http://127.0.0.1:8081/api/v1"
    api_key: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::builder()
                .user_agent(DEFAULT_USER_AGENT)
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn auth_header(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("X-API-Key", &self.api_key)
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<RawResponse, ApiError> {
        let url = self.url(path);
        debug!(%method, %url, "PowerDNS request");

        let mut req = self
            .auth_header(self.http.request(method, url))
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = &body {
            req = req.json(body);
        }

        let res = req.send().await?;
        let status = res.status();
        let body = res.bytes().await?.to_vec();
        debug!(%status, len = body.len(), "PowerDNS response");

        Ok(RawResponse { status, body })
    }
}
