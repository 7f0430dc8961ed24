//! Integration tests for stateless batch enrichment.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn test_batch_returns_only_changed_documents() {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(dir.path());

    let (status, json) = common::post_json(
        app,
        "/api/v1/enrichment/batch",
        &json!({
            "documents": [
                { "id": "a", "content": "Make a DC 12 Dexterity (Stealth or Acrobatics) check." },
                { "id": "b", "content": "The door is locked." },
                { "id": "c", "content": "Hit: 7 (2d6) fire damage." }
            ],
            "options": { "skills": true, "damage": true }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["changed"], json!(["a", "c"]));
    assert_eq!(
        json["results"],
        json!([
            { "id": "a", "content": "Make a [[/skill dex ste 12]] or [[/skill dex acr 12]] check." },
            { "id": "c", "content": "Hit: [[/damage 2d6 fire average=true]] damage." }
        ])
    );
}

#[tokio::test]
async fn test_batch_applies_rules_in_fixed_order_regardless_of_request_order() {
    let content = "A DC 15 Dexterity (Thieves' Tools) check. The Undead is Frightened.";
    let expected = "A [[/tool dex thief 15]] check. The Undead (See &Reference[undead]) \
                    is Frightened (See &Reference[frightened]).";

    for options in [
        json!({ "tools": true, "conditions": true, "creatureType": true }),
        json!({ "creatureType": true, "conditions": true, "tools": true }),
    ] {
        let dir = TempDir::new().unwrap();
        let app = common::build_test_app(dir.path());

        let (status, json) = common::post_json(
            app,
            "/api/v1/enrichment/batch",
            &json!({ "documents": [{ "id": "a", "content": content }], "options": options }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["results"][0]["content"], expected);
    }
}

#[tokio::test]
async fn test_batch_with_disabled_rules_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(dir.path());

    let (status, json) = common::post_json(
        app,
        "/api/v1/enrichment/batch",
        &json!({
            "documents": [{ "id": "a", "content": "DC 15 Strength check" }],
            "options": { "abilities": false }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["changed"], json!([]));
    assert_eq!(json["results"], json!([]));
}

#[tokio::test]
async fn test_batch_without_options_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = common::build_test_app(dir.path());

    let (status, _) = common::post_json(
        app,
        "/api/v1/enrichment/batch",
        &json!({ "documents": [] }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
