//! The storage seam used by the API layer.

use async_trait::async_trait;
use shopseo_core::analytics::{NewOptimizationAttempt, OptimizationAttempt};
use shopseo_core::preferences::{PromptPreferences, PromptPreferencesUpdate};
use shopseo_core::types::{DbId, Timestamp};

use crate::error::StoreResult;
use crate::models::product::{Product, UpsertProduct};
use crate::models::store::{CreateStore, Store};

/// Storage for stores, their product snapshots, and their preferences.
///
/// Every method that takes a `store_id` fails with
/// [`crate::StoreError::NotFound`] when the store is unknown.
#[async_trait]
pub trait ShopRepository: Send + Sync {
    /// Onboard a store and create its default preferences.
    async fn create_store(&self, input: &CreateStore) -> StoreResult<Store>;
    async fn get_store(&self, store_id: DbId) -> StoreResult<Store>;
    /// Offboard a store, removing its products and preferences.
    async fn delete_store(&self, store_id: DbId) -> StoreResult<()>;

    async fn upsert_product(&self, store_id: DbId, input: &UpsertProduct) -> StoreResult<Product>;
    /// Fetch a product scoped to a store. A product of another store is
    /// reported as not found.
    async fn get_product(&self, store_id: DbId, product_id: DbId) -> StoreResult<Product>;
    async fn list_products(&self, store_id: DbId, limit: i64, offset: i64)
        -> StoreResult<Vec<Product>>;

    /// Stored preferences, or `None` if the store has none yet.
    async fn find_preferences(&self, store_id: DbId) -> StoreResult<Option<PromptPreferences>>;
    /// Merge a validated update into the store's preferences atomically and
    /// return the full resulting record.
    async fn update_preferences(
        &self,
        store_id: DbId,
        update: &PromptPreferencesUpdate,
    ) -> StoreResult<PromptPreferences>;

    /// Append one generation attempt to the store's analytics log.
    async fn record_attempt(&self, attempt: &NewOptimizationAttempt) -> StoreResult<()>;
    /// The store's attempts created at or after `since`, oldest first.
    async fn list_attempts(
        &self,
        store_id: DbId,
        since: Timestamp,
    ) -> StoreResult<Vec<OptimizationAttempt>>;

    async fn health_check(&self) -> StoreResult<()>;
    fn backend_name(&self) -> &'static str;
}
