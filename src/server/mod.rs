// file: src/server/mod.rs
// description: web front-end serving the search page
// reference: https://docs.rs/axum

pub mod handlers;
pub mod router;
pub mod state;

pub use router::router;
pub use state::{AppState, LastSearch, Session};

use crate::config::Config;
use crate::error::{AppError, Result};
use tokio::net::TcpListener;
use tracing::info;

pub async fn serve(config: &Config) -> Result<()> {
    let state = AppState::initialize(config)?;
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Serving RAG search on http://{}", listener.local_addr()?);
    info!(
        "Vector store: {} | default model: {}",
        config.provider.vector_store_id, config.search.model
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server(e.to_string()))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}
