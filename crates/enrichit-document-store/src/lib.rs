//! Filesystem-backed journal store for the Enrich It journal enricher.
//!
//! Each journal is one JSON file holding its pages. Only pages of type
//! `text` are exposed for enrichment.

mod fs_document_store;

pub use fs_document_store::FsDocumentStore;
