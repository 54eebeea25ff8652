// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod server;
pub mod utils;

pub use client::{HttpTransport, QueryClient, ResponsesRequest, ResponsesResponse, Transport};
pub use config::{ApiKey, Config, ProviderConfig, SearchDefaults, ServerConfig};
pub use error::{AppError, Result, SearchError};
pub use models::{
    Citation, HistoryEntry, Model, ResultItem, SearchHistory, SearchRequest, SearchResult,
    SourceCard,
};
pub use render::{FormState, annotate_html, annotate_plain, render_page};
pub use server::{AppState, router, serve};
pub use utils::{HealthCheck, HealthReport, HealthStatus, OperationTimer, Validator};
