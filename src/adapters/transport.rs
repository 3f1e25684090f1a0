//! Reqwest-backed transport
//!
//! One shared client for all upstream traffic. Per-attempt deadlines
//! live in the application layer's guard, so the client itself only
//! bounds connection establishment.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::domain::error::GatewayError;
use crate::domain::provider::{HttpMethod, PreparedRequest};
use crate::ports::transport::{Transport, TransportResponse};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, GatewayError> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("tickergate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: PreparedRequest) -> Result<TransportResponse, GatewayError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.http.get(&request.url),
            HttpMethod::Post => self.http.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let transport = ReqwestTransport::new();
        assert!(transport.is_ok());
    }
}
