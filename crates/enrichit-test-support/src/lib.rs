//! Shared test doubles and fixtures for the Enrich It journal enricher.

mod clock;
mod store;
mod vocabulary;

pub use clock::FixedClock;
pub use store::{
    EmptyDocumentStore, FailingDocumentStore, RecordingDocumentStore, RejectingDocumentStore,
};
pub use vocabulary::fixture_vocabulary;
