//! HTTP transport for a real gateway deployment.
//!
//! Posts request envelopes as JSON to `{base_url}{path}` with a
//! SigV4-shaped authorization header. The header carries the credential
//! scope only; computing a real signature is the gateway team's side of
//! the contract and is not done here.

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::transport::{Method, RequestEnvelope};
use chrono::Utc;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Default request timeout for gateway calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Network transport wrapping a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Send one envelope and return the response body as JSON.
    pub async fn send(
        &self,
        config: &GatewayConfig,
        request: &RequestEnvelope,
    ) -> Result<Value, GatewayError> {
        let url = format!(
            "{}{}",
            config.base_url.trim_end_matches('/'),
            request.path
        );
        let amz_date = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();

        debug!(%url, method = ?request.method, "sending gateway request");

        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url).json(&request.body),
        };

        let response = builder
            .header("authorization", authorization_header(config, &amz_date))
            .header("x-amz-date", &amz_date)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Transport(format!("request to {url} timed out"))
                } else if e.is_connect() {
                    GatewayError::Transport(format!(
                        "cannot connect to gateway at {}",
                        config.base_url
                    ))
                } else {
                    GatewayError::Transport(format!("failed to send request: {e}"))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Transport(format!(
                "gateway error {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::Transport(format!("failed to parse gateway response: {e}")))
    }
}

/// Format the SigV4-style authorization header from the connection
/// configuration. Carries credential scope only; the signature field is
/// a placeholder until the gateway enforces signing.
fn authorization_header(config: &GatewayConfig, amz_date: &str) -> String {
    let date = &amz_date[..8.min(amz_date.len())];
    format!(
        "AWS4-HMAC-SHA256 Credential={}/{}/{}/dem/aws4_request, \
         SignedHeaders=host;x-amz-date, Signature=unsigned",
        config.access_key, date, config.region
    )
}
