//! Command handlers for the enrichment context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: load pages, run the pipeline, persist changes.

use std::fmt;

use chrono::{DateTime, Utc};
use enrichit_core::clock::Clock;
use enrichit_core::command::Command;
use enrichit_core::document::DocumentStore;
use enrichit_core::error::DomainError;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::domain::commands::{EnrichBatch, EnrichJournal};
use crate::domain::enricher::Enricher;
use crate::domain::pipeline::{self, BatchResult};

/// What a journal run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EnrichmentOutcome {
    /// Changed pages were persisted.
    Updated {
        /// Number of pages written.
        pages: usize,
    },
    /// No page content changed; nothing was written.
    NoChangesNeeded,
}

impl fmt::Display for EnrichmentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Updated { pages } => {
                write!(f, "Updated {pages} page(s) with enriched rolls.")
            }
            Self::NoChangesNeeded => f.write_str("No changes were needed."),
        }
    }
}

/// Result of enriching a journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichJournalResult {
    /// The journal that was enriched.
    pub journal_id: String,
    /// Ids of the pages that were rewritten.
    pub changed: Vec<String>,
    /// Run outcome.
    pub outcome: EnrichmentOutcome,
    /// When the run completed.
    pub completed_at: DateTime<Utc>,
}

/// Handles the `EnrichJournal` command: lists the journal's text pages,
/// runs the pipeline, and persists the changed pages in one batch.
///
/// The store is not written to when nothing changed.
///
/// # Errors
///
/// Returns `DomainError` if listing or persisting pages fails.
#[instrument(skip_all, fields(journal_id = %command.journal_id))]
pub async fn handle_enrich_journal(
    command: &EnrichJournal,
    enricher: &Enricher,
    clock: &dyn Clock,
    store: &dyn DocumentStore,
) -> Result<EnrichJournalResult, DomainError> {
    debug!(
        command_type = command.command_type(),
        correlation_id = %command.correlation_id,
        journal_id = %command.journal_id,
        "enriching journal"
    );

    let pages = store.list_text_pages(&command.journal_id).await?;
    let batch = pipeline::apply_all(enricher, &pages, &command.options);

    let outcome = if batch.is_empty() {
        EnrichmentOutcome::NoChangesNeeded
    } else {
        store
            .update_contents(&command.journal_id, &batch.results)
            .await?;
        EnrichmentOutcome::Updated {
            pages: batch.results.len(),
        }
    };

    info!(journal_id = %command.journal_id, pages = pages.len(), "{outcome}");

    Ok(EnrichJournalResult {
        journal_id: command.journal_id.clone(),
        changed: batch.changed,
        outcome,
        completed_at: clock.now(),
    })
}

/// Handles the `EnrichBatch` command: a pure pipeline run over the supplied
/// pages.
#[must_use]
pub fn handle_enrich_batch(command: &EnrichBatch, enricher: &Enricher) -> BatchResult {
    let batch = pipeline::apply_all(enricher, &command.documents, &command.options);
    info!(
        correlation_id = %command.correlation_id,
        documents = command.documents.len(),
        changed = batch.changed.len(),
        "enriched batch"
    );
    batch
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use enrichit_core::document::{DocumentUpdate, TextDocument};
    use enrichit_core::error::DomainError;
    use uuid::Uuid;

    use crate::application::command_handlers::{
        EnrichmentOutcome, handle_enrich_batch, handle_enrich_journal,
    };
    use crate::domain::commands::{EnrichBatch, EnrichJournal};
    use crate::domain::enricher::Enricher;
    use crate::domain::options::EnrichmentOptions;
    use enrichit_test_support::{
        EmptyDocumentStore, FailingDocumentStore, FixedClock, RecordingDocumentStore,
        RejectingDocumentStore, fixture_vocabulary,
    };

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    fn enricher() -> Enricher {
        Enricher::new(Arc::new(fixture_vocabulary())).unwrap()
    }

    fn command(options: EnrichmentOptions) -> EnrichJournal {
        EnrichJournal {
            correlation_id: Uuid::new_v4(),
            journal_id: "bestiary".to_owned(),
            options,
        }
    }

    #[tokio::test]
    async fn test_handle_enrich_journal_persists_changed_pages_once() {
        // Arrange
        let store = RecordingDocumentStore::new(vec![
            TextDocument::new("p1", "DC 15 Strength check"),
            TextDocument::new("p2", "Nothing here."),
            TextDocument::new("p3", "+4 to hit"),
        ]);

        // Act
        let result = handle_enrich_journal(
            &command(EnrichmentOptions::all()),
            &enricher(),
            &fixed_clock(),
            &store,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(result.journal_id, "bestiary");
        assert_eq!(result.changed, vec!["p1".to_owned(), "p3".to_owned()]);
        assert_eq!(result.outcome, EnrichmentOutcome::Updated { pages: 2 });
        assert_eq!(result.completed_at, fixed_clock().0);

        let writes = store.updates();
        assert_eq!(writes.len(), 1);
        let (journal_id, updates) = &writes[0];
        assert_eq!(journal_id, "bestiary");
        assert_eq!(
            updates,
            &vec![
                DocumentUpdate {
                    id: "p1".to_owned(),
                    content: "[[/check str 15]] check".to_owned(),
                },
                DocumentUpdate {
                    id: "p3".to_owned(),
                    content: "[[/r 1d20+4]] to hit".to_owned(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_handle_enrich_journal_without_changes_does_not_write() {
        let store = RecordingDocumentStore::new(vec![TextDocument::new("p1", "Nothing here.")]);

        let result = handle_enrich_journal(
            &command(EnrichmentOptions::all()),
            &enricher(),
            &fixed_clock(),
            &store,
        )
        .await
        .unwrap();

        assert_eq!(result.outcome, EnrichmentOutcome::NoChangesNeeded);
        assert!(result.changed.is_empty());
        assert!(store.updates().is_empty());
    }

    #[tokio::test]
    async fn test_handle_enrich_journal_with_no_rules_does_not_write() {
        let store =
            RecordingDocumentStore::new(vec![TextDocument::new("p1", "DC 15 Strength check")]);

        let result = handle_enrich_journal(
            &command(EnrichmentOptions::none()),
            &enricher(),
            &fixed_clock(),
            &store,
        )
        .await
        .unwrap();

        assert_eq!(result.outcome, EnrichmentOutcome::NoChangesNeeded);
        assert!(store.updates().is_empty());
    }

    #[tokio::test]
    async fn test_handle_enrich_journal_with_empty_journal() {
        let result = handle_enrich_journal(
            &command(EnrichmentOptions::all()),
            &enricher(),
            &fixed_clock(),
            &EmptyDocumentStore,
        )
        .await
        .unwrap();

        assert_eq!(result.outcome, EnrichmentOutcome::NoChangesNeeded);
    }

    #[tokio::test]
    async fn test_handle_enrich_journal_propagates_listing_failure() {
        let result = handle_enrich_journal(
            &command(EnrichmentOptions::all()),
            &enricher(),
            &fixed_clock(),
            &FailingDocumentStore,
        )
        .await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }

    #[tokio::test]
    async fn test_handle_enrich_journal_propagates_write_failure() {
        let store =
            RejectingDocumentStore::new(vec![TextDocument::new("p1", "DC 15 Strength check")]);

        let result = handle_enrich_journal(
            &command(EnrichmentOptions::all()),
            &enricher(),
            &fixed_clock(),
            &store,
        )
        .await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(
            EnrichmentOutcome::Updated { pages: 3 }.to_string(),
            "Updated 3 page(s) with enriched rolls."
        );
        assert_eq!(
            EnrichmentOutcome::NoChangesNeeded.to_string(),
            "No changes were needed."
        );
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let value = serde_json::to_value(EnrichmentOutcome::Updated { pages: 2 }).unwrap();
        assert_eq!(value, serde_json::json!({ "status": "updated", "pages": 2 }));

        let value = serde_json::to_value(EnrichmentOutcome::NoChangesNeeded).unwrap();
        assert_eq!(value, serde_json::json!({ "status": "no_changes_needed" }));
    }

    #[test]
    fn test_handle_enrich_batch_is_pure() {
        let command = EnrichBatch {
            correlation_id: Uuid::new_v4(),
            documents: vec![TextDocument::new("a", "100 xp")],
            options: EnrichmentOptions::all(),
        };

        let batch = handle_enrich_batch(&command, &enricher());

        assert_eq!(batch.changed, vec!["a".to_owned()]);
        assert_eq!(batch.results[0].content, "[[/award 100xp]]");
    }
}
