//! Executing `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the only place I/O happens. `UreqTransport` performs one
//! blocking POST per call with no retries; its only policy knob is the
//! timeout taken from `ClientConfig`. Closures with the right signature are
//! transports too, which lets tests script replies without a server.

use std::time::Duration;

use tracing::debug;
use ureq::http::{HeaderName, HeaderValue};

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Performs one HTTP exchange.
///
/// Implementations return `Err` only when no reply was received; any reply,
/// whatever its status code, comes back as `Ok`.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, ApiError>,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// `timeout` bounds the whole exchange; `None` disables it.
    pub fn new(timeout: Option<Duration>) -> Self {
        // Status codes are interpreted by ApiClient, not by ureq.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(url = %request.url, bytes = request.body.len(), "POST");

        let mut builder = self.agent.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let mut response = builder
            .send(request.body.as_bytes())
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| header_pair(name, value))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        debug!(status, "reply received");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Header values are not required to be ASCII; other bytes are decoded lossily.
fn header_pair(name: &HeaderName, value: &HeaderValue) -> (String, String) {
    (
        name.to_string(),
        String::from_utf8_lossy(value.as_bytes()).into_owned(),
    )
}
