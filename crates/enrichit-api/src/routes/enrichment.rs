//! Stateless batch enrichment.

use axum::extract::State;
use axum::{Json, Router, routing::post};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use enrichit_core::document::TextDocument;
use enrichit_rules::application::command_handlers;
use enrichit_rules::domain::commands;
use enrichit_rules::domain::groups::Selection;
use enrichit_rules::domain::options::EnrichmentOptions;
use enrichit_rules::domain::pipeline::BatchResult;

use crate::state::AppState;

/// Request body for POST /batch.
#[derive(Debug, Deserialize)]
pub struct EnrichBatchRequest {
    /// Pages to enrich.
    pub documents: Vec<TextDocument>,
    /// Enabled rules; rules absent from the map are disabled.
    pub options: EnrichmentOptions,
}

/// POST /batch
#[instrument(skip(state, request), fields(documents = request.documents.len()))]
async fn enrich_batch(
    State(state): State<AppState>,
    Json(request): Json<EnrichBatchRequest>,
) -> Json<BatchResult> {
    let options = state
        .rule_groups
        .derive_options_snapshot(&Selection::from(&request.options));
    let command = commands::EnrichBatch {
        correlation_id: Uuid::new_v4(),
        documents: request.documents,
        options,
    };

    info!(correlation_id = %command.correlation_id, "handling enrich_batch command");

    Json(command_handlers::handle_enrich_batch(&command, &state.enricher))
}

/// Returns the router for batch enrichment.
pub fn router() -> Router<AppState> {
    Router::new().route("/batch", post(enrich_batch))
}
