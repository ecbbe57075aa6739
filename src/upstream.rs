//! Client for the Linkup search API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::Config;
use crate::error::{AdapterError, UpstreamError};

/// Payload sent upstream for a single query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamQueryParams {
    pub q: String,
    pub depth: String,
    pub output_type: String,
    pub include_images: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_domains: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_domains: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<String>,
}

/// A search backend taking one query payload and returning the raw document.
#[async_trait]
pub trait SearchUpstream: Send + Sync {
    /// Perform one search. Implementations must give up after `timeout`.
    async fn search(
        &self,
        params: &UpstreamQueryParams,
        timeout: Duration,
    ) -> Result<Value, UpstreamError>;
}

pub struct LinkupClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl LinkupClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Result<Self, AdapterError> {
        let client = Client::builder()
            .user_agent(concat!("linkup-proxy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AdapterError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    /// The key may be absent here; the orchestrator refuses to search without one.
    pub fn from_config(config: &Config) -> Result<Self, AdapterError> {
        Self::new(
            config.upstream_url.clone(),
            config.api_key.clone().unwrap_or_default(),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, params: &UpstreamQueryParams) -> Result<Value, UpstreamError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(params)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // error bodies are not guaranteed to be JSON
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| UpstreamError::InvalidBody(e.to_string()))
    }
}

#[async_trait]
impl SearchUpstream for LinkupClient {
    async fn search(
        &self,
        params: &UpstreamQueryParams,
        timeout: Duration,
    ) -> Result<Value, UpstreamError> {
        // dropping the future on expiry aborts the in-flight request
        match tokio::time::timeout(timeout, self.post(params)).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::Timeout {
                timeout_ms: millis(timeout),
            }),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
