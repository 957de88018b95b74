//! Stateless request builder and response parser for the JSON API.
//!
//! # Design
//! `ApiClient` holds only the endpoint URL and carries no session state.
//! `build` wraps an operation's parameters in the `op`/`sid`/`seq` envelope
//! and produces an `HttpRequest`; `parse` turns an `HttpResponse` into the
//! operation's typed `ApiResponse`. The caller supplies the session id and
//! sequence number and performs the round-trip in between, which keeps this
//! type deterministic and free of I/O.

use serde::Deserialize;
use serde_json::Value;

use crate::config;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{lenient, ApiResponse, Envelope, Operation, STATUS_OK};

/// Error code reported when a failed reply carries no `content.error`.
const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

/// Builds `HttpRequest` values and parses `HttpResponse` values for any
/// [`Operation`] without touching the network.
#[derive(Debug, Clone)]
pub struct ApiClient {
    api_url: String,
}

/// Envelope of every reply before `content` is given its operation type.
#[derive(Deserialize)]
struct RawReply {
    #[serde(default, deserialize_with = "lenient::int")]
    seq: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    status: i64,
    #[serde(default)]
    content: Value,
}

impl ApiClient {
    /// `base_url` is the installation root; requests go to `<base_url>/api/`.
    pub fn new(base_url: &str) -> Self {
        Self {
            api_url: config::api_url(base_url),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn build<O: Operation>(
        &self,
        op: &O,
        sid: Option<&str>,
        seq: u64,
    ) -> Result<HttpRequest, ApiError> {
        let envelope = Envelope::new(op, sid, seq);
        let body = serde_json::to_string(&envelope)
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            url: self.api_url.clone(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body,
        })
    }

    /// Decode a reply. A nonzero `status` is not an `Err`: it comes back as
    /// a response whose `error` holds the server's code.
    pub fn parse<O: Operation>(
        &self,
        response: HttpResponse,
    ) -> Result<ApiResponse<O::Content>, ApiError> {
        check_status(&response)?;
        let raw: RawReply = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;
        let seq = u64::try_from(raw.seq).unwrap_or_default();
        let status = i32::try_from(raw.status).unwrap_or(i32::MAX);

        if status != STATUS_OK {
            let code = raw
                .content
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN_ERROR)
                .to_string();
            let content = serde_json::from_value(raw.content).unwrap_or_default();
            return Ok(ApiResponse {
                seq,
                status,
                content,
                error: Some(ApiError::Application(code)),
            });
        }

        let content = if raw.content.is_null() {
            O::Content::default()
        } else {
            serde_json::from_value(raw.content)
                .map_err(|e| ApiError::Deserialization(format!("{}: {e}", O::NAME)))?
        };
        Ok(ApiResponse {
            seq,
            status,
            content,
            error: None,
        })
    }
}

/// The API reports failures in the body; anything but 200 is a transport
/// problem (proxy, wrong URL, server crash).
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.status == 200 {
        return Ok(());
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}
