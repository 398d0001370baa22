//! Client side of the relay call

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use super::reply::RawReply;
use crate::models::RelayRequest;

#[derive(Debug, Error)]
pub enum RelayClientError {
    /// The request never produced a response
    #[error("{0}")]
    Network(String),

    #[error("Failed to create HTTP client: {0}")]
    Setup(String),
}

/// Sends a transcript to the relay gateway
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn send(&self, request: &RelayRequest) -> Result<RawReply, RelayClientError>;
}

/// reqwest-backed transport posting JSON to the gateway URL
pub struct HttpRelayClient {
    http_client: Client,
    gateway_url: String,
}

impl HttpRelayClient {
    pub fn new(gateway_url: impl Into<String>) -> Result<Self, RelayClientError> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| RelayClientError::Setup(e.to_string()))?;

        Ok(Self {
            http_client,
            gateway_url: gateway_url.into(),
        })
    }
}

#[async_trait]
impl RelayTransport for HttpRelayClient {
    async fn send(&self, request: &RelayRequest) -> Result<RawReply, RelayClientError> {
        let response = self
            .http_client
            .post(&self.gateway_url)
            .json(request)
            .send()
            .await
            .map_err(|e| RelayClientError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| RelayClientError::Network(e.to_string()))?;

        Ok(RawReply { status, body })
    }
}
