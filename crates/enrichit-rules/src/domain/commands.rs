//! Commands for the enrichment context.

use enrichit_core::command::Command;
use enrichit_core::document::TextDocument;
use uuid::Uuid;

use super::options::EnrichmentOptions;

/// Command to enrich every text page of a journal and persist the changes.
#[derive(Debug, Clone)]
pub struct EnrichJournal {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The journal whose pages are enriched.
    pub journal_id: String,
    /// Options snapshot for this run.
    pub options: EnrichmentOptions,
}

impl Command for EnrichJournal {
    fn command_type(&self) -> &'static str {
        "enrichment.enrich_journal"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to enrich caller-supplied pages without touching any store.
#[derive(Debug, Clone)]
pub struct EnrichBatch {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Pages to enrich.
    pub documents: Vec<TextDocument>,
    /// Options snapshot for this run.
    pub options: EnrichmentOptions,
}

impl Command for EnrichBatch {
    fn command_type(&self) -> &'static str {
        "enrichment.enrich_batch"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
