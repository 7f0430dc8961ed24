//! Test document stores: mock `DocumentStore` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use enrichit_core::document::{DocumentStore, DocumentUpdate, TextDocument};
use enrichit_core::error::DomainError;

/// A document store that serves a fixed list of text pages for any journal
/// and records every `update_contents` call.
#[derive(Debug)]
pub struct RecordingDocumentStore {
    pages: Vec<TextDocument>,
    updates: Mutex<Vec<(String, Vec<DocumentUpdate>)>>,
}

impl RecordingDocumentStore {
    /// Create a store that returns `pages` from every `list_text_pages` call.
    #[must_use]
    pub fn new(pages: Vec<TextDocument>) -> Self {
        Self {
            pages,
            updates: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of every `(journal_id, updates)` batch written.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn updates(&self) -> Vec<(String, Vec<DocumentUpdate>)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentStore for RecordingDocumentStore {
    async fn list_text_pages(&self, _journal_id: &str) -> Result<Vec<TextDocument>, DomainError> {
        Ok(self.pages.clone())
    }

    async fn update_contents(
        &self,
        journal_id: &str,
        updates: &[DocumentUpdate],
    ) -> Result<(), DomainError> {
        self.updates
            .lock()
            .unwrap()
            .push((journal_id.to_owned(), updates.to_vec()));
        Ok(())
    }
}

/// A document store whose journals have no text pages and that silently
/// accepts writes.
#[derive(Debug)]
pub struct EmptyDocumentStore;

#[async_trait]
impl DocumentStore for EmptyDocumentStore {
    async fn list_text_pages(&self, _journal_id: &str) -> Result<Vec<TextDocument>, DomainError> {
        Ok(vec![])
    }

    async fn update_contents(
        &self,
        _journal_id: &str,
        _updates: &[DocumentUpdate],
    ) -> Result<(), DomainError> {
        Ok(())
    }
}

/// A document store that always returns an infrastructure error.
#[derive(Debug)]
pub struct FailingDocumentStore;

#[async_trait]
impl DocumentStore for FailingDocumentStore {
    async fn list_text_pages(&self, _journal_id: &str) -> Result<Vec<TextDocument>, DomainError> {
        Err(DomainError::Infrastructure("storage unavailable".into()))
    }

    async fn update_contents(
        &self,
        _journal_id: &str,
        _updates: &[DocumentUpdate],
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("storage unavailable".into()))
    }
}

/// A document store that lists pages normally but rejects every write.
#[derive(Debug)]
pub struct RejectingDocumentStore {
    pages: Vec<TextDocument>,
}

impl RejectingDocumentStore {
    /// Create a store that returns `pages` and fails on `update_contents`.
    #[must_use]
    pub fn new(pages: Vec<TextDocument>) -> Self {
        Self { pages }
    }
}

#[async_trait]
impl DocumentStore for RejectingDocumentStore {
    async fn list_text_pages(&self, _journal_id: &str) -> Result<Vec<TextDocument>, DomainError> {
        Ok(self.pages.clone())
    }

    async fn update_contents(
        &self,
        journal_id: &str,
        _updates: &[DocumentUpdate],
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure(format!(
            "journal {journal_id} is read-only"
        )))
    }
}
