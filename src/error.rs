//! Error taxonomy for the gateway client.
//!
//! Failures never cross the public client boundary as `Err` or panics;
//! they are converted into an error-wrapped [`GatewayResponse`]
//! carrying the `Display` string of one of these variants.
//!
//! [`GatewayResponse`]: crate::models::GatewayResponse

use thiserror::Error;

/// Everything that can go wrong between a request method and its response.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The client has no connection configuration; requests are refused
    /// before any dispatch happens.
    #[error("client not configured")]
    NotConfigured,

    /// The request path matched no responder in the mock dispatch table.
    ///
    /// The message text is part of the mock contract and must not change.
    #[error("Mock endpoint not implemented")]
    NotImplemented,

    /// Network-level fault from the HTTP transport (timeout, connection
    /// refused, non-2xx status, unparseable body).
    #[error("transport error: {0}")]
    Transport(String),

    /// Request body or response payload failed to (de)serialize.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
