//! Postgres `ShopRepository` tests.
//!
//! These need a database. Run with
//! `DATABASE_URL=postgres://... cargo test -p shopseo-db -- --ignored`.

use assert_matches::assert_matches;
use shopseo_core::preferences::{BrandVoiceUpdate, PromptPreferences, PromptPreferencesUpdate};
use shopseo_db::models::product::UpsertProduct;
use shopseo_db::models::store::CreateStore;
use shopseo_db::{PgShopRepository, ShopRepository, StoreError};
use sqlx::PgPool;

fn new_store(domain: &str) -> CreateStore {
    CreateStore {
        shop_domain: domain.to_string(),
        name: None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn create_store_writes_default_preferences(pool: PgPool) {
    let repo = PgShopRepository::new(pool);
    let store = repo.create_store(&new_store("pg.myshopify.com")).await.unwrap();

    let prefs = repo.find_preferences(store.id).await.unwrap();
    assert_eq!(prefs, Some(PromptPreferences::default()));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_domain_maps_to_conflict(pool: PgPool) {
    let repo = PgShopRepository::new(pool);
    repo.create_store(&new_store("dup.myshopify.com")).await.unwrap();

    let err = repo
        .create_store(&new_store("dup.myshopify.com"))
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Conflict(_));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn nested_update_merges_per_sub_field(pool: PgPool) {
    let repo = PgShopRepository::new(pool);
    let store = repo.create_store(&new_store("merge.myshopify.com")).await.unwrap();

    let updated = repo
        .update_preferences(
            store.id,
            &PromptPreferencesUpdate {
                brand_voice: Some(BrandVoiceUpdate {
                    formality: Some("casual".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.brand_voice.formality, "casual");
    assert_eq!(updated.brand_voice.personality, "professional");
    let stored = repo.find_preferences(store.id).await.unwrap().unwrap();
    assert_eq!(stored, updated);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn concurrent_saves_serialize_per_store(pool: PgPool) {
    let repo = std::sync::Arc::new(PgShopRepository::new(pool));
    let store = repo.create_store(&new_store("race.myshopify.com")).await.unwrap();
    let store_id = store.id;

    let a = {
        let repo = repo.clone();
        tokio::spawn(async move {
            repo.update_preferences(
                store_id,
                &PromptPreferencesUpdate {
                    tone: Some("casual".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
        })
    };
    let b = {
        let repo = repo.clone();
        tokio::spawn(async move {
            repo.update_preferences(
                store_id,
                &PromptPreferencesUpdate {
                    writing_style: Some("concise".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
        })
    };
    a.await.unwrap();
    b.await.unwrap();

    let stored = repo.find_preferences(store_id).await.unwrap().unwrap();
    assert_eq!(stored.tone, "casual");
    assert_eq!(stored.writing_style, "concise");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn delete_cascades_to_products(pool: PgPool) {
    let repo = PgShopRepository::new(pool);
    let store = repo.create_store(&new_store("gone.myshopify.com")).await.unwrap();
    let product = repo
        .upsert_product(
            store.id,
            &UpsertProduct {
                shopify_product_id: "1".to_string(),
                title: "Tee".to_string(),
                description: None,
                handle: None,
                vendor: None,
                product_type: None,
                tags: Vec::new(),
            },
        )
        .await
        .unwrap();

    repo.delete_store(store.id).await.unwrap();
    assert_matches!(
        repo.get_product(store.id, product.id).await,
        Err(StoreError::NotFound { .. })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn attempts_round_trip_through_the_log(pool: PgPool) {
    use chrono::{Duration, Utc};
    use shopseo_core::analytics::NewOptimizationAttempt;
    use shopseo_core::generation::GenerationErrorKind;

    let repo = PgShopRepository::new(pool);
    let store = repo.create_store(&new_store("stats.myshopify.com")).await.unwrap();
    let product = repo
        .upsert_product(
            store.id,
            &UpsertProduct {
                shopify_product_id: "7".to_string(),
                title: "Lamp".to_string(),
                description: None,
                handle: None,
                vendor: None,
                product_type: None,
                tags: Vec::new(),
            },
        )
        .await
        .unwrap();

    repo.record_attempt(&NewOptimizationAttempt {
        store_id: store.id,
        product_id: product.id,
        error_kind: Some(GenerationErrorKind::ContentPolicy),
        elapsed_ms: 80,
    })
    .await
    .unwrap();

    let listed = repo
        .list_attempts(store.id, Utc::now() - Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].error_kind.as_deref(), Some("content_policy"));
    assert_eq!(listed[0].elapsed_ms, 80);

    let err = repo
        .record_attempt(&NewOptimizationAttempt {
            store_id: store.id,
            product_id: product.id + 1000,
            error_kind: None,
            elapsed_ms: 10,
        })
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::NotFound { entity: "Product", .. });
}
