//! Journal enrichment against the document store.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use enrichit_rules::application::command_handlers::{self, EnrichmentOutcome};
use enrichit_rules::application::query_handlers::{self, PreviewView};
use enrichit_rules::domain::commands;
use enrichit_rules::domain::groups::Selection;
use enrichit_rules::domain::options::EnrichmentOptions;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for the journal endpoints.
#[derive(Debug, Deserialize)]
pub struct JournalRunRequest {
    /// Enabled rules; rules absent from the map are disabled.
    pub options: EnrichmentOptions,
}

/// Response body for POST /{journal_id}/enrich.
#[derive(Debug, Serialize)]
pub struct EnrichJournalResponse {
    /// The journal that was enriched.
    pub journal_id: String,
    /// Ids of the pages that were rewritten.
    pub changed: Vec<String>,
    /// Run outcome.
    pub outcome: EnrichmentOutcome,
    /// User-facing summary of the outcome.
    pub message: String,
    /// When the run completed.
    pub completed_at: DateTime<Utc>,
}

/// POST /{journal_id}/enrich
#[instrument(skip(state, request))]
async fn enrich_journal(
    State(state): State<AppState>,
    Path(journal_id): Path<String>,
    Json(request): Json<JournalRunRequest>,
) -> Result<Json<EnrichJournalResponse>, ApiError> {
    let options = state
        .rule_groups
        .derive_options_snapshot(&Selection::from(&request.options));
    let command = commands::EnrichJournal {
        correlation_id: Uuid::new_v4(),
        journal_id,
        options,
    };

    info!(correlation_id = %command.correlation_id, "handling enrich_journal command");

    let result = command_handlers::handle_enrich_journal(
        &command,
        &state.enricher,
        state.clock.as_ref(),
        state.document_store.as_ref(),
    )
    .await?;

    Ok(Json(EnrichJournalResponse {
        message: result.outcome.to_string(),
        journal_id: result.journal_id,
        changed: result.changed,
        outcome: result.outcome,
        completed_at: result.completed_at,
    }))
}

/// POST /{journal_id}/preview
#[instrument(skip(state, request))]
async fn preview_journal(
    State(state): State<AppState>,
    Path(journal_id): Path<String>,
    Json(request): Json<JournalRunRequest>,
) -> Result<Json<PreviewView>, ApiError> {
    let options = state
        .rule_groups
        .derive_options_snapshot(&Selection::from(&request.options));
    let view = query_handlers::preview_journal_enrichment(
        &journal_id,
        &options,
        &state.enricher,
        state.document_store.as_ref(),
    )
    .await?;

    Ok(Json(view))
}

/// Returns the router for journal enrichment.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{journal_id}/enrich", post(enrich_journal))
        .route("/{journal_id}/preview", post(preview_journal))
}
