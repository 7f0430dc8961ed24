//! Shared application state.

use std::sync::Arc;

use enrichit_core::clock::Clock;
use enrichit_core::document::DocumentStore;
use enrichit_rules::domain::enricher::Enricher;
use enrichit_rules::domain::groups::RuleGroupTree;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Rule engine compiled against the loaded vocabulary.
    pub enricher: Arc<Enricher>,
    /// Toggle tree served to clients. Request options are snapshotted
    /// through it, so rules outside the tree never run.
    pub rule_groups: Arc<RuleGroupTree>,
    /// Clock stamped onto run results.
    pub clock: Arc<dyn Clock>,
    /// Journal page storage.
    pub document_store: Arc<dyn DocumentStore>,
}

impl AppState {
    /// Create new application state with the standard rule group tree.
    #[must_use]
    pub fn new(
        enricher: Arc<Enricher>,
        clock: Arc<dyn Clock>,
        document_store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            enricher,
            rule_groups: Arc::new(RuleGroupTree::standard()),
            clock,
            document_store,
        }
    }
}
