// file: src/client/query.rs
// description: stateless query client executing one file_search per request

use crate::client::parse::normalize;
use crate::client::transport::{HttpTransport, Transport};
use crate::client::wire::ResponsesRequest;
use crate::config::ProviderConfig;
use crate::error::SearchError;
use crate::models::{SearchRequest, SearchResult};
use crate::utils::OperationTimer;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const SLOW_SEARCH_THRESHOLD: Duration = Duration::from_secs(20);

/// Holds only the transport and the vector store id it was built with.
#[derive(Clone)]
pub struct QueryClient {
    transport: Arc<dyn Transport>,
    vector_store_id: String,
}

impl QueryClient {
    pub fn new(transport: Arc<dyn Transport>, vector_store_id: impl Into<String>) -> Self {
        Self {
            transport,
            vector_store_id: vector_store_id.into(),
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self, SearchError> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::new(Arc::new(transport), config.vector_store_id.clone()))
    }

    pub fn vector_store_id(&self) -> &str {
        &self.vector_store_id
    }

    pub fn build_request(&self, request: &SearchRequest) -> ResponsesRequest {
        ResponsesRequest::file_search(request, &self.vector_store_id)
    }

    /// Validates, makes exactly one provider call, and normalizes the answer.
    pub async fn execute(&self, request: &SearchRequest) -> Result<SearchResult, SearchError> {
        request.validate()?;

        info!(
            "Searching {} with {} (max_results: {}, include_results: {})",
            self.vector_store_id, request.model, request.max_results, request.include_results
        );

        let timer = OperationTimer::new("file_search");
        let payload = self.build_request(request);

        let response = match self.transport.send(&payload).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Search failed ({}): {}", e.kind(), e);
                return Err(e);
            }
        };
        timer.warn_if_slow(SLOW_SEARCH_THRESHOLD, "provider call");

        let result = normalize(response, request.include_results)?;
        timer.finish();

        info!(
            "Received answer with {} citation(s) and {} result(s)",
            result.citations.len(),
            result.results.len()
        );

        Ok(result)
    }
}
