// file: src/server/state.rs
// description: shared application state and the in-memory search session

use crate::client::QueryClient;
use crate::config::{Config, SearchDefaults};
use crate::error::{AppError, Result, SearchError};
use crate::models::{SearchHistory, SearchRequest, SearchResult};
use crate::render::FormState;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// The form as last submitted and what came back.
#[derive(Debug, Clone)]
pub struct LastSearch {
    pub form: FormState,
    pub outcome: std::result::Result<SearchResult, SearchError>,
}

/// History plus the last outcome. Lost when the process exits.
#[derive(Debug, Default)]
pub struct Session {
    pub history: SearchHistory,
    pub last: Option<LastSearch>,
}

pub struct AppState {
    pub defaults: SearchDefaults,
    pub vector_store_id: String,
    pub client: QueryClient,
    pub session: Mutex<Session>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn initialize(config: &Config) -> Result<Arc<Self>> {
        let client = QueryClient::from_config(&config.provider)
            .map_err(|e| AppError::Config(e.to_string()))?;
        Ok(Self::with_client(config.search.clone(), client))
    }

    pub fn with_client(defaults: SearchDefaults, client: QueryClient) -> Arc<Self> {
        Arc::new(Self {
            defaults,
            vector_store_id: client.vector_store_id().to_string(),
            client,
            session: Mutex::new(Session::default()),
            started_at: Utc::now(),
        })
    }

    /// Runs one search and records it. Only successes enter the history.
    pub async fn run_search(
        &self,
        form: FormState,
        request: std::result::Result<SearchRequest, SearchError>,
    ) -> std::result::Result<SearchResult, SearchError> {
        let outcome = match request {
            Ok(request) => self
                .client
                .execute(&request)
                .await
                .map(|result| (request, result)),
            Err(e) => Err(e),
        };

        let mut session = self.session.lock().await;
        let outcome = match outcome {
            Ok((request, result)) => {
                session.history.push(request, result.clone());
                info!("Session history now holds {} search(es)", session.history.len());
                Ok(result)
            }
            Err(e) => {
                warn!("Search not recorded in history: {}", e);
                Err(e)
            }
        };

        session.last = Some(LastSearch {
            form,
            outcome: outcome.clone(),
        });

        outcome
    }
}
