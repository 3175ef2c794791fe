//! HTTP seam between providers and the network.
//!
//! # Responsibility
//! - Define the minimal outbound surface providers are allowed to use.
//! - Provide the production `reqwest` implementation with a bounded
//!   request timeout.
//!
//! # Invariants
//! - One trait call is one HTTP request; callers own status handling.
//! - Tests substitute a recording implementation, so provider logic never
//!   requires a live network.

use crate::sync::provider::{SyncError, SyncResult};
use serde_json::Value;
use std::time::Duration;

/// Raw outcome of one request. `body` is kept as text so callers decide
/// how (and whether) to decode it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound HTTP operations needed by the sync layer.
pub trait PushTransport {
    /// POSTs a JSON body with a bearer token (service create calls).
    fn post_json(&self, url: &str, bearer: &str, body: &Value) -> SyncResult<TransportResponse>;

    /// POSTs form fields without auth (the OAuth token endpoint).
    fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> SyncResult<TransportResponse>;
}

/// Production transport over a blocking `reqwest` client.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Builds a client with the configured per-request timeout so a push
    /// cannot block its caller indefinitely.
    pub fn new(timeout: Duration) -> SyncResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| SyncError::Transport(err.to_string()))?;
        Ok(Self { client })
    }
}

impl PushTransport for HttpTransport {
    fn post_json(&self, url: &str, bearer: &str, body: &Value) -> SyncResult<TransportResponse> {
        let response = self
            .client
            .post(url)
            .bearer_auth(bearer)
            .json(body)
            .send()
            .map_err(|err| SyncError::Transport(err.to_string()))?;

        read_response(response)
    }

    fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> SyncResult<TransportResponse> {
        let response = self
            .client
            .post(url)
            .form(fields)
            .send()
            .map_err(|err| SyncError::Transport(err.to_string()))?;

        read_response(response)
    }
}

fn read_response(response: reqwest::blocking::Response) -> SyncResult<TransportResponse> {
    let status = response.status().as_u16();
    let body = response
        .text()
        .map_err(|err| SyncError::Transport(err.to_string()))?;
    Ok(TransportResponse { status, body })
}
