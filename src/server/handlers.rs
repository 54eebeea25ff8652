// file: src/server/handlers.rs
// description: page, form and JSON handlers for the search front-end

use crate::config::SearchDefaults;
use crate::error::SearchError;
use crate::models::{HistoryEntry, Model, SearchRequest, SearchResult};
use crate::render::{FormState, render_page};
use crate::server::state::{AppState, LastSearch, Session};
use crate::utils::{HealthCheck, HealthReport};
use axum::Json;
use axum::extract::{Form, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

const STYLES: &str = include_str!("../../static/styles.css");

/// Fields as posted by the HTML form. An unchecked checkbox is simply absent.
#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub max_results: Option<String>,
    #[serde(default)]
    pub include_results: Option<String>,
}

impl SearchForm {
    pub fn into_request(
        self,
        defaults: &SearchDefaults,
    ) -> (FormState, Result<SearchRequest, SearchError>) {
        let model = parse_model(self.model.as_deref());
        let max_results = self
            .max_results
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                raw.parse::<i64>().map_err(|_| {
                    SearchError::InvalidRequest(format!(
                        "max_results must be a whole number (got {})",
                        raw
                    ))
                })
            })
            .transpose();
        let include_results = self.include_results.is_some();

        let mut form = FormState::from_defaults(defaults);
        form.query = self.query.clone();
        form.include_results = include_results;
        if let Ok(Some(model)) = &model {
            form.model = *model;
        }
        if let Ok(Some(n)) = &max_results
            && let Ok(n) = u32::try_from(*n)
            && n >= 1
        {
            form.max_results = n;
        }

        let request = build_request(defaults, self.query, model, max_results, include_results);
        (form, request)
    }
}

/// JSON body for `POST /api/search`. Missing options fall back to configured defaults.
#[derive(Debug, Deserialize)]
pub struct ApiSearchRequest {
    pub query: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub max_results: Option<i64>,
    #[serde(default)]
    pub include_results: Option<bool>,
}

impl ApiSearchRequest {
    pub fn into_request(
        self,
        defaults: &SearchDefaults,
    ) -> (FormState, Result<SearchRequest, SearchError>) {
        let model = parse_model(self.model.as_deref());
        let include_results = self.include_results.unwrap_or(defaults.include_results);

        let mut form = FormState::from_defaults(defaults);
        form.query = self.query.clone();
        form.include_results = include_results;
        if let Ok(Some(model)) = &model {
            form.model = *model;
        }

        let request = build_request(
            defaults,
            self.query,
            model,
            Ok(self.max_results),
            include_results,
        );
        (form, request)
    }
}

fn parse_model(raw: Option<&str>) -> Result<Option<Model>, SearchError> {
    raw.filter(|m| !m.trim().is_empty())
        .map(str::parse::<Model>)
        .transpose()
}

fn build_request(
    defaults: &SearchDefaults,
    query: String,
    model: Result<Option<Model>, SearchError>,
    max_results: Result<Option<i64>, SearchError>,
    include_results: bool,
) -> Result<SearchRequest, SearchError> {
    let model = model?.unwrap_or(defaults.model);
    let max_results = max_results?.unwrap_or(i64::from(defaults.max_results));
    SearchRequest::new(query, model, max_results, include_results)
}

/// JSON error body for the API routes.
pub struct ApiError(pub SearchError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            SearchError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            SearchError::Transport(_) => StatusCode::GATEWAY_TIMEOUT,
            SearchError::Authentication(_)
            | SearchError::Provider { .. }
            | SearchError::Parse(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "error": self.0.detail(),
            "kind": self.0.kind(),
            "retryable": self.0.is_retryable(),
        }));
        (status, body).into_response()
    }
}

fn render_session(state: &AppState, session: &Session) -> String {
    let default_form = FormState::from_defaults(&state.defaults);
    match &session.last {
        Some(last) => render_page(&last.form, Some(last.outcome.as_ref()), &session.history),
        None => render_page(&default_form, None, &session.history),
    }
}

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let session = state.session.lock().await;
    Html(render_session(&state, &session))
}

pub async fn submit_search(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Html<String> {
    let (form, request) = form.into_request(&state.defaults);
    let outcome = state.run_search(form.clone(), request).await;

    let session = state.session.lock().await;
    Html(render_page(&form, Some(outcome.as_ref()), &session.history))
}

pub async fn api_search(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ApiSearchRequest>,
) -> Result<Json<SearchResult>, ApiError> {
    let (form, request) = body.into_request(&state.defaults);
    state
        .run_search(form, request)
        .await
        .map(Json)
        .map_err(ApiError)
}

pub async fn api_history(State(state): State<Arc<AppState>>) -> Json<Vec<HistoryEntry>> {
    let session = state.session.lock().await;
    Json(session.history.entries().to_vec())
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    let session = state.session.lock().await;
    let checks = health_checks(&state.vector_store_id, session.last.as_ref());
    Json(HealthReport::new(
        checks,
        env!("CARGO_PKG_VERSION").to_string(),
        state.started_at,
    ))
}

/// Health derived from the last search. A missing store or a rejected key is unhealthy.
fn health_checks(vector_store_id: &str, last: Option<&LastSearch>) -> Vec<HealthCheck> {
    let store = format!("vector_store:{}", vector_store_id);
    let failure = last.and_then(|last| last.outcome.as_ref().err());

    match failure {
        Some(SearchError::Provider {
            status: 404,
            message,
        }) => vec![
            HealthCheck::unhealthy(&store, message.clone()),
            HealthCheck::healthy("provider"),
        ],
        Some(SearchError::Authentication(message)) => vec![
            HealthCheck::healthy(&store),
            HealthCheck::unhealthy("provider", format!("Credential rejected: {}", message)),
        ],
        Some(SearchError::InvalidRequest(_)) | None => {
            vec![HealthCheck::healthy(&store), HealthCheck::healthy("provider")]
        }
        Some(e) => vec![
            HealthCheck::healthy(&store),
            HealthCheck::degraded("provider", format!("Last search failed: {}", e)),
        ],
    }
}

pub async fn styles() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLES)
}
