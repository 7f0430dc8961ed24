//! Filesystem implementation of the `DocumentStore` trait.
//!
//! A journal lives at `<root>/<journal_id>.json`:
//!
//! ```json
//! { "name": "Bestiary", "pages": [{ "id": "p1", "type": "text", "content": "<p>…</p>" }] }
//! ```
//!
//! Fields the store does not know about are kept as-is when a journal is
//! rewritten.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use enrichit_core::document::{DocumentStore, DocumentUpdate, TextDocument};
use enrichit_core::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::debug;

const TEXT_PAGE: &str = "text";

#[derive(Debug, Serialize, Deserialize)]
struct JournalFile {
    #[serde(default)]
    pages: Vec<StoredPage>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredPage {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Journal store backed by one JSON file per journal.
#[derive(Debug)]
pub struct FsDocumentStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FsDocumentStore {
    /// Creates a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The directory holding the journal files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn journal_path(&self, journal_id: &str) -> Result<PathBuf, DomainError> {
        let valid = !journal_id.is_empty()
            && !journal_id.starts_with('.')
            && !journal_id.contains(['/', '\\']);
        if !valid {
            return Err(DomainError::Validation(format!(
                "invalid journal id: {journal_id:?}"
            )));
        }
        Ok(self.root.join(format!("{journal_id}.json")))
    }

    async fn read_journal(&self, journal_id: &str) -> Result<(PathBuf, JournalFile), DomainError> {
        let path = self.journal_path(journal_id)?;
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DomainError::JournalNotFound(journal_id.to_owned()));
            }
            Err(e) => {
                return Err(DomainError::Infrastructure(format!(
                    "failed to read journal {journal_id}: {e}"
                )));
            }
        };
        let journal = serde_json::from_str(&raw).map_err(|e| {
            DomainError::Infrastructure(format!("journal {journal_id} is malformed: {e}"))
        })?;
        Ok((path, journal))
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn list_text_pages(&self, journal_id: &str) -> Result<Vec<TextDocument>, DomainError> {
        let (_, journal) = self.read_journal(journal_id).await?;
        let total = journal.pages.len();
        let pages: Vec<TextDocument> = journal
            .pages
            .into_iter()
            .filter(|page| page.kind == TEXT_PAGE)
            .map(|page| TextDocument::new(page.id, page.content))
            .collect();

        debug!(journal_id, total, text_pages = pages.len(), "listed journal pages");
        Ok(pages)
    }

    async fn update_contents(
        &self,
        journal_id: &str,
        updates: &[DocumentUpdate],
    ) -> Result<(), DomainError> {
        if updates.is_empty() {
            return Ok(());
        }

        let _guard = self.write_lock.lock().await;
        let (path, mut journal) = self.read_journal(journal_id).await?;

        let mut pending: HashMap<&str, &str> = updates
            .iter()
            .map(|u| (u.id.as_str(), u.content.as_str()))
            .collect();
        for page in journal.pages.iter_mut().filter(|p| p.kind == TEXT_PAGE) {
            if let Some(content) = pending.remove(page.id.as_str()) {
                content.clone_into(&mut page.content);
            }
        }
        if let Some(missing) = pending.keys().next() {
            return Err(DomainError::Validation(format!(
                "journal {journal_id} has no text page {missing}"
            )));
        }

        let serialized = serde_json::to_string_pretty(&journal).map_err(|e| {
            DomainError::Infrastructure(format!("failed to serialize journal {journal_id}: {e}"))
        })?;
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, serialized)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("failed to write journal: {e}")))?;
        tokio::fs::rename(&staging, &path)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("failed to replace journal: {e}")))?;

        debug!(journal_id, pages = updates.len(), "persisted journal pages");
        Ok(())
    }
}
