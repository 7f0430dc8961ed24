//! Enrich It API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use enrichit_api::config::{self, AppConfig};
use enrichit_api::error::AppError;
use enrichit_api::state::AppState;
use enrichit_core::clock::SystemClock;
use enrichit_document_store::FsDocumentStore;
use enrichit_rules::domain::enricher::Enricher;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Enrich It API server");

    let config = AppConfig::from_env()?;

    let vocabulary = config::load_vocabulary(&config.vocabulary_path)?;
    if vocabulary.is_empty() {
        tracing::warn!(
            path = %config.vocabulary_path.display(),
            "vocabulary is empty; only vocabulary-free rules will rewrite text"
        );
    }
    let enricher = Enricher::new(Arc::new(vocabulary))?;
    tracing::info!(path = %config.vocabulary_path.display(), "Loaded vocabulary");

    let document_store = FsDocumentStore::new(&config.journals_dir);
    let app_state = AppState::new(
        Arc::new(enricher),
        Arc::new(SystemClock),
        Arc::new(document_store),
    );

    let app = enrichit_api::app(app_state);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
