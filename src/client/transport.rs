// file: src/client/transport.rs
// description: outbound transport to the Responses API over HTTPS
// reference: https://docs.rs/reqwest

use crate::client::wire::{ErrorEnvelope, ResponsesRequest, ResponsesResponse};
use crate::config::{ApiKey, ProviderConfig};
use crate::error::SearchError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// One request, one response. Implementations must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ResponsesRequest) -> Result<ResponsesResponse, SearchError>;
}

pub struct HttpTransport {
    client: Client,
    endpoint: String,
    api_key: ApiKey,
}

impl HttpTransport {
    pub fn new(base_url: &str, api_key: ApiKey, timeout: Duration) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: format!("{}/responses", base_url.trim_end_matches('/')),
            api_key,
        })
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self, SearchError> {
        Self::new(&config.base_url, config.api_key.clone(), config.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ResponsesRequest) -> Result<ResponsesResponse, SearchError> {
        if self.api_key.is_empty() {
            return Err(SearchError::Authentication(
                "API credential is missing".to_string(),
            ));
        }

        debug!(
            "POST {} (model: {}, {} tool(s))",
            self.endpoint,
            request.model,
            request.tools.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose())
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        debug!("Provider responded with {} bytes", body.len());

        serde_json::from_str(&body)
            .map_err(|e| SearchError::Parse(format!("Unexpected response body: {}", e)))
    }
}

fn transport_error(err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        SearchError::Transport(format!("Request timed out: {}", err))
    } else if err.is_connect() {
        SearchError::Transport(format!("Connection failed: {}", err))
    } else {
        SearchError::Transport(format!("Request failed: {}", err))
    }
}

/// Maps a non-success status to an error kind, keeping the provider's message verbatim.
pub(crate) fn status_error(status: StatusCode, body: &str) -> SearchError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                trimmed.to_string()
            }
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SearchError::Authentication(message),
        _ => SearchError::Provider {
            status: status.as_u16(),
            message,
        },
    }
}
