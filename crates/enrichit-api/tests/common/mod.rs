//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use enrichit_core::clock::Clock;
use enrichit_document_store::FsDocumentStore;
use enrichit_rules::domain::enricher::Enricher;
use enrichit_test_support::{FixedClock, fixture_vocabulary};
use http_body_util::BodyExt;
use tower::ServiceExt;

use enrichit_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app router over a real `FsDocumentStore` rooted at
/// `journals_dir`, the fixture vocabulary and a fixed clock.
pub fn build_test_app(journals_dir: &Path) -> Router {
    let enricher = Arc::new(Enricher::new(Arc::new(fixture_vocabulary())).unwrap());
    let store = Arc::new(FsDocumentStore::new(journals_dir));
    enrichit_api::app(AppState::new(enricher, fixed_clock(), store))
}

/// Write a journal file with the given `(id, type, content)` pages.
pub fn write_journal(journals_dir: &Path, journal_id: &str, pages: &[(&str, &str, &str)]) {
    let pages: Vec<serde_json::Value> = pages
        .iter()
        .map(|(id, kind, content)| serde_json::json!({ "id": id, "type": kind, "content": content }))
        .collect();
    let journal = serde_json::json!({ "name": journal_id, "pages": pages });
    std::fs::write(
        journals_dir.join(format!("{journal_id}.json")),
        serde_json::to_vec_pretty(&journal).unwrap(),
    )
    .unwrap();
}

/// Read back a journal file as JSON.
pub fn read_journal(journals_dir: &Path, journal_id: &str) -> serde_json::Value {
    let raw = std::fs::read(journals_dir.join(format!("{journal_id}.json"))).unwrap();
    serde_json::from_slice(&raw).unwrap()
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}
