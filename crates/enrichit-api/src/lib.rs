//! Enrich It: HTTP API over the journal enricher.

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

/// Builds the full application router.
pub fn app(state: state::AppState) -> Router {
    // TODO: Replace CorsLayer::permissive() with the configured VTT origin.
    Router::new()
        .merge(routes::health::router())
        .merge(routes::rule_groups::router())
        .nest("/api/v1/enrichment", routes::enrichment::router())
        .nest("/api/v1/journals", routes::journals::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
