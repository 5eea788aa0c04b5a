//! Request envelopes and the backend seam.
//!
//! Every typed operation on the client reduces to a [`RequestEnvelope`]
//! handed to a [`Backend`]: either the in-memory mock (deterministic
//! canned fixtures, no I/O) or the HTTP transport aimed at a real
//! gateway.

pub mod http;
pub mod mock;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use serde_json::Value;

/// HTTP method of an outbound call. Peer listing is a GET; every
/// data-bearing call is a POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One outbound call: target path, method, and serialized body.
///
/// The path uniquely determines which mock responder answers it.
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    pub path: String,
    pub method: Method,
    pub body: Value,
}

/// Where requests go.
#[derive(Debug, Clone)]
pub enum Backend {
    /// Deterministic in-memory fixtures, dispatched by path substring.
    Mock,
    /// Real network transport.
    Http(http::HttpTransport),
}

impl Backend {
    /// Send one request and return the raw JSON payload.
    pub async fn send(
        &self,
        config: &GatewayConfig,
        request: &RequestEnvelope,
    ) -> Result<Value, GatewayError> {
        match self {
            Backend::Mock => mock::dispatch(&request.path),
            Backend::Http(transport) => transport.send(config, request).await,
        }
    }
}
