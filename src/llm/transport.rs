//! Seams for the network call and the backoff wait.

use crate::config::Config;
use crate::llm::errors::CompletionError;
use crate::llm::types::{LLMRequest, RawResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Performs one POST. Only transport failures are errors; any HTTP
    /// status comes back as a [`RawResponse`].
    async fn post(&self, request: &LLMRequest) -> Result<RawResponse, CompletionError>;
}

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

pub struct HttpTransport {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| CompletionError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn post(&self, request: &LLMRequest) -> Result<RawResponse, CompletionError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Network(
                        "Request timeout - the API took too long to respond".to_string(),
                    )
                } else if e.is_connect() {
                    CompletionError::Network("Connection error - unable to reach the API".to_string())
                } else {
                    CompletionError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::Network(format!("Failed to read response body: {}", e)))?;

        Ok(RawResponse { status, body })
    }
}
