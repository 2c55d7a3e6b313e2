//! Execution primitives: the pieces that actually put a request on the wire.
//!
//! # Design
//! `Transport` is the blocking seam and `AsyncTransport` the future-returning
//! one. Both hand back non-2xx responses as data; only a failure to obtain a
//! response at all is an `Err`. Status interpretation stays in
//! `TwilioClient::parse_*`. No retries, no timeouts beyond what the
//! underlying HTTP client is configured with.
//!
//! `UreqTransport` and `ReqwestTransport` are the stock implementations;
//! anything else (a recording stub, a proxy) can implement the traits.

use std::fmt;

use async_trait::async_trait;

use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Blocking execution of one request.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Asynchronous execution of one request. The returned future resolves
/// exactly once, with the response or the transport failure.
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Blocking transport backed by `ureq`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    /// Agent that returns 4xx/5xx responses as data rather than `Err`.
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let url = request.url();
        tracing::debug!(method = request.method.as_str(), url = %url, "executing request");

        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Delete => {
                let mut builder = self.agent.delete(&url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                let body = request.body().unwrap_or_default();
                builder.send(body.as_bytes())
            }
        };

        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        tracing::debug!(status, "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Async transport backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AsyncTransport for ReqwestTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let url = request.url();
        tracing::debug!(method = request.method.as_str(), url = %url, "executing request");

        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.client.request(method, &url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body() {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        tracing::debug!(status, "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
