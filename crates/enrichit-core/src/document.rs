//! Text documents and the document store abstraction.
//!
//! The store owns journal pages. The enrichment engine only ever reads
//! snapshots of page content and hands back replacement content for the
//! pages it changed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A snapshot of one text page owned by the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDocument {
    /// Page identifier, unique within its journal.
    pub id: String,
    /// Page content (HTML or plain text).
    pub content: String,
}

impl TextDocument {
    /// Creates a new document snapshot.
    #[must_use]
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

/// Replacement content for a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentUpdate {
    /// The page being updated.
    pub id: String,
    /// The new page content.
    pub content: String,
}

/// Store trait for listing journal pages and persisting updated content.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Lists the text pages of a journal. Non-text pages are never returned.
    async fn list_text_pages(&self, journal_id: &str) -> Result<Vec<TextDocument>, DomainError>;

    /// Persists new content for the given pages in a single batch.
    async fn update_contents(
        &self,
        journal_id: &str,
        updates: &[DocumentUpdate],
    ) -> Result<(), DomainError>;
}
