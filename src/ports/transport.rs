//! Transport port
//!
//! One seam over outbound HTTP so the router, resolver and submitter
//! can be exercised against scripted responses without a network.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::error::GatewayError;
use crate::domain::provider::PreparedRequest;

/// Raw upstream response before any classification
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON
    pub fn json(&self) -> Result<Value, GatewayError> {
        serde_json::from_str(&self.body)
            .map_err(|e| GatewayError::MalformedPayload(e.to_string()))
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute the request and return status plus body. Transport-level
    /// failures map to `GatewayError::Network`; non-2xx statuses are
    /// returned as responses, not errors, so callers can classify them.
    async fn execute(&self, request: PreparedRequest) -> Result<TransportResponse, GatewayError>;
}
