//! HTTP-level tests for prompt preferences and the options catalog.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, put_json, put_raw};
use serde_json::json;
use shopseo_core::options::OptionsCatalog;
use shopseo_core::preferences::PromptPreferences;

fn prefs_uri(store_id: i64) -> String {
    format!("/api/stores/{store_id}/prompts/preferences")
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn defaults_are_returned_and_stable_across_reads() {
    let app = common::build_test_app();
    let store = app.seed_store("defaults.myshopify.com").await;

    let first = body_json(get(app.router(), &prefs_uri(store.id)).await).await;
    let second = body_json(get(app.router(), &prefs_uri(store.id)).await).await;

    let expected = serde_json::to_value(PromptPreferences::default()).unwrap();
    assert_eq!(first["prompt_preferences"], expected);
    assert_eq!(first, second);
    assert_eq!(expected["brand_voice"]["formality"], "formal");
    assert_eq!(expected["key_features"], json!([]));
}

#[tokio::test]
async fn missing_record_reads_as_defaults() {
    let app = common::build_test_app();
    let store = app.seed_store("norecord.myshopify.com").await;
    app.repo.clear_preferences(store.id).await;

    let json = body_json(get(app.router(), &prefs_uri(store.id)).await).await;
    assert_eq!(
        json["prompt_preferences"],
        serde_json::to_value(PromptPreferences::default()).unwrap()
    );
}

#[tokio::test]
async fn unknown_store_returns_404() {
    let app = common::build_test_app();

    let response = get(app.router(), &prefs_uri(4242)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = put_json(app.router(), &prefs_uri(4242), json!({"tone": "casual"})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Saves
// ---------------------------------------------------------------------------

#[tokio::test]
async fn partial_update_changes_only_supplied_fields() {
    let app = common::build_test_app();
    let store = app.seed_store("partial.myshopify.com").await;

    put_json(
        app.router(),
        &prefs_uri(store.id),
        json!({"key_features": ["Dishwasher safe", "Handmade"]}),
    )
    .await;
    let response = put_json(app.router(), &prefs_uri(store.id), json!({"tone": "casual"})).await;

    assert_eq!(response.status(), StatusCode::OK);
    let prefs = &body_json(response).await["prompt_preferences"];
    assert_eq!(prefs["tone"], "casual");
    assert_eq!(prefs["key_features"], json!(["Dishwasher safe", "Handmade"]));
    assert_eq!(prefs["target_audience"], "general");
    assert_eq!(prefs["brand_voice"]["personality"], "professional");
}

#[tokio::test]
async fn nested_brand_voice_merges_per_sub_field() {
    let app = common::build_test_app();
    let store = app.seed_store("nested.myshopify.com").await;

    let response = put_json(
        app.router(),
        &prefs_uri(store.id),
        json!({"brand_voice": {"emotion": "excited"}}),
    )
    .await;

    let prefs = &body_json(response).await["prompt_preferences"];
    assert_eq!(
        prefs["brand_voice"],
        json!({"personality": "professional", "emotion": "excited", "formality": "formal"})
    );
}

#[tokio::test]
async fn lists_are_replaced_wholesale() {
    let app = common::build_test_app();
    let store = app.seed_store("lists.myshopify.com").await;

    put_json(
        app.router(),
        &prefs_uri(store.id),
        json!({"avoid_words": ["cheap", "best"]}),
    )
    .await;
    let response = put_json(
        app.router(),
        &prefs_uri(store.id),
        json!({"avoid_words": ["cheap"], "template_sections": ["introduction", "call_to_action"]}),
    )
    .await;

    let prefs = &body_json(response).await["prompt_preferences"];
    assert_eq!(prefs["avoid_words"], json!(["cheap"]));
    assert_eq!(prefs["template_sections"], json!(["introduction", "call_to_action"]));
}

#[tokio::test]
async fn empty_string_clears_optional_text() {
    let app = common::build_test_app();
    let store = app.seed_store("clear.myshopify.com").await;

    put_json(
        app.router(),
        &prefs_uri(store.id),
        json!({"custom_instructions": "Mention free shipping"}),
    )
    .await;
    let response = put_json(
        app.router(),
        &prefs_uri(store.id),
        json!({"custom_instructions": ""}),
    )
    .await;

    let prefs = &body_json(response).await["prompt_preferences"];
    assert!(prefs["custom_instructions"].is_null());
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_enum_is_rejected_and_nothing_changes() {
    let app = common::build_test_app();
    let store = app.seed_store("invalid.myshopify.com").await;
    let before = body_json(get(app.router(), &prefs_uri(store.id)).await).await;

    let response = put_json(
        app.router(),
        &prefs_uri(store.id),
        json!({"writing_style": "concise", "tone": "sarcastic"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["details"]["field"], "tone");
    assert_eq!(
        json["details"]["allowed"],
        serde_json::to_value(OptionsCatalog::default().tones).unwrap()
    );

    let after = body_json(get(app.router(), &prefs_uri(store.id)).await).await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn invalid_nested_enum_names_the_nested_field() {
    let app = common::build_test_app();
    let store = app.seed_store("nestedbad.myshopify.com").await;

    let response = put_json(
        app.router(),
        &prefs_uri(store.id),
        json!({"brand_voice": {"formality": "rowdy"}}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["details"]["field"],
        "brand_voice.formality"
    );
}

#[tokio::test]
async fn explicit_null_is_rejected() {
    let app = common::build_test_app();
    let store = app.seed_store("null.myshopify.com").await;

    let response = put_json(app.router(), &prefs_uri(store.id), json!({"tone": null})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("tone must not be null"));
}

#[tokio::test]
async fn unknown_field_is_rejected() {
    let app = common::build_test_app();
    let store = app.seed_store("drift.myshopify.com").await;

    let response = put_json(
        app.router(),
        &prefs_uri(store.id),
        json!({"tone": "casual", "voice_pitch": "low"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let after = body_json(get(app.router(), &prefs_uri(store.id)).await).await;
    assert_eq!(after["prompt_preferences"]["tone"], "professional");
}

#[tokio::test]
async fn malformed_json_is_validation_error() {
    let app = common::build_test_app();
    let store = app.seed_store("garbage.myshopify.com").await;

    let response = put_raw(app.router(), &prefs_uri(store.id), "{tone: casual").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn too_many_key_features_is_rejected() {
    let app = common::build_test_app();
    let store = app.seed_store("many.myshopify.com").await;
    let features: Vec<String> = (0..21).map(|i| format!("Feature {i}")).collect();

    let response = put_json(
        app.router(),
        &prefs_uri(store.id),
        json!({"key_features": features}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[tokio::test]
async fn concurrent_saves_apply_in_some_total_order() {
    let app = common::build_test_app();
    let store = app.seed_store("race.myshopify.com").await;
    let uri = prefs_uri(store.id);

    let a = put_json(app.router(), &uri, json!({"tone": "casual"}));
    let b = put_json(app.router(), &uri, json!({"writing_style": "concise"}));
    let c = put_json(app.router(), &uri, json!({"brand_voice": {"emotion": "confident"}}));
    let (a, b, c) = tokio::join!(a, b, c);
    assert_eq!(a.status(), StatusCode::OK);
    assert_eq!(b.status(), StatusCode::OK);
    assert_eq!(c.status(), StatusCode::OK);

    let prefs = &body_json(get(app.router(), &uri).await).await["prompt_preferences"];
    assert_eq!(prefs["tone"], "casual");
    assert_eq!(prefs["writing_style"], "concise");
    assert_eq!(prefs["brand_voice"]["emotion"], "confident");
}

// ---------------------------------------------------------------------------
// Options catalog
// ---------------------------------------------------------------------------

#[tokio::test]
async fn options_endpoint_returns_catalog() {
    let app = common::build_test_app();

    let response = get(app.router(), "/api/prompts/options").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, serde_json::to_value(OptionsCatalog::default()).unwrap());
    assert!(json["tones"]
        .as_array()
        .unwrap()
        .contains(&json!("professional")));
}

#[tokio::test]
async fn custom_catalog_governs_validation() {
    let mut catalog = OptionsCatalog::default();
    catalog.tones.push("whimsical".to_string());
    let app = common::build_test_app_with_catalog(
        common::StubGenerator::new(),
        std::time::Duration::from_secs(5),
        catalog,
    );
    let store = app.seed_store("custom.myshopify.com").await;

    let response = put_json(app.router(), &prefs_uri(store.id), json!({"tone": "whimsical"})).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["prompt_preferences"]["tone"],
        "whimsical"
    );
}
