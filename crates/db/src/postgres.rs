//! [`ShopRepository`] backed by PostgreSQL.

use async_trait::async_trait;
use shopseo_core::analytics::{NewOptimizationAttempt, OptimizationAttempt};
use shopseo_core::preferences::{PromptPreferences, PromptPreferencesUpdate};
use shopseo_core::types::{DbId, Timestamp};

use crate::error::{StoreError, StoreResult};
use crate::models::product::{Product, UpsertProduct};
use crate::models::store::{CreateStore, Store};
use crate::repositories::{OptimizationAttemptRepo, ProductRepo, PromptPreferencesRepo, StoreRepo};
use crate::repository::ShopRepository;
use crate::DbPool;

/// PostgreSQL error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL error code for foreign key violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Clone)]
pub struct PgShopRepository {
    pool: DbPool,
}

impl PgShopRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    async fn ensure_store(&self, store_id: DbId) -> StoreResult<Store> {
        StoreRepo::find_by_id(&self.pool, store_id)
            .await?
            .ok_or_else(|| StoreError::store_not_found(store_id))
    }
}

#[async_trait]
impl ShopRepository for PgShopRepository {
    async fn create_store(&self, input: &CreateStore) -> StoreResult<Store> {
        StoreRepo::create(&self.pool, input).await.map_err(|err| match &err {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                tracing::debug!(shop_domain = %input.shop_domain, "Duplicate store rejected");
                StoreError::Conflict(format!(
                    "A store with shop_domain '{}' already exists",
                    input.shop_domain
                ))
            }
            _ => StoreError::Database(err),
        })
    }

    async fn get_store(&self, store_id: DbId) -> StoreResult<Store> {
        self.ensure_store(store_id).await
    }

    async fn delete_store(&self, store_id: DbId) -> StoreResult<()> {
        if StoreRepo::delete(&self.pool, store_id).await? {
            Ok(())
        } else {
            Err(StoreError::store_not_found(store_id))
        }
    }

    async fn upsert_product(&self, store_id: DbId, input: &UpsertProduct) -> StoreResult<Product> {
        self.ensure_store(store_id).await?;
        Ok(ProductRepo::upsert(&self.pool, store_id, input).await?)
    }

    async fn get_product(&self, store_id: DbId, product_id: DbId) -> StoreResult<Product> {
        self.ensure_store(store_id).await?;
        ProductRepo::find_for_store(&self.pool, store_id, product_id)
            .await?
            .ok_or_else(|| StoreError::product_not_found(product_id))
    }

    async fn list_products(
        &self,
        store_id: DbId,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Product>> {
        self.ensure_store(store_id).await?;
        Ok(ProductRepo::list_for_store(&self.pool, store_id, limit, offset).await?)
    }

    async fn find_preferences(&self, store_id: DbId) -> StoreResult<Option<PromptPreferences>> {
        self.ensure_store(store_id).await?;
        Ok(PromptPreferencesRepo::find_by_store(&self.pool, store_id).await?)
    }

    async fn update_preferences(
        &self,
        store_id: DbId,
        update: &PromptPreferencesUpdate,
    ) -> StoreResult<PromptPreferences> {
        PromptPreferencesRepo::apply_update(&self.pool, store_id, update)
            .await?
            .ok_or_else(|| StoreError::store_not_found(store_id))
    }

    async fn record_attempt(&self, attempt: &NewOptimizationAttempt) -> StoreResult<()> {
        self.ensure_store(attempt.store_id).await?;
        OptimizationAttemptRepo::create(&self.pool, attempt)
            .await
            .map_err(|err| match &err {
                sqlx::Error::Database(db_err)
                    if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) =>
                {
                    StoreError::product_not_found(attempt.product_id)
                }
                _ => StoreError::Database(err),
            })
    }

    async fn list_attempts(
        &self,
        store_id: DbId,
        since: Timestamp,
    ) -> StoreResult<Vec<OptimizationAttempt>> {
        self.ensure_store(store_id).await?;
        Ok(OptimizationAttemptRepo::list_since(&self.pool, store_id, since).await?)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(crate::health_check(&self.pool).await?)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
