//! In-memory [`ShopRepository`].
//!
//! All state lives in one map set behind a `tokio::sync::Mutex`. Every
//! operation takes the lock for its whole duration, so a preference save is
//! a read-merge-write that no other save can interleave with. State is lost
//! on restart; this backend is for local runs and tests.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use shopseo_core::analytics::{NewOptimizationAttempt, OptimizationAttempt};
use shopseo_core::generation::GenerationErrorKind;
use shopseo_core::preferences::{PromptPreferences, PromptPreferencesUpdate};
use shopseo_core::types::{DbId, Timestamp};
use tokio::sync::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::models::product::{Product, UpsertProduct};
use crate::models::store::{CreateStore, Store};
use crate::repository::ShopRepository;

#[derive(Default)]
struct State {
    next_store_id: DbId,
    next_product_id: DbId,
    next_attempt_id: DbId,
    stores: HashMap<DbId, Store>,
    /// Ordered by id so listing matches the Postgres `ORDER BY id`.
    products: BTreeMap<DbId, Product>,
    preferences: HashMap<DbId, PromptPreferences>,
    attempts: Vec<OptimizationAttempt>,
}

impl State {
    fn ensure_store(&self, store_id: DbId) -> StoreResult<()> {
        if self.stores.contains_key(&store_id) {
            Ok(())
        } else {
            Err(StoreError::store_not_found(store_id))
        }
    }
}

#[derive(Default)]
pub struct MemoryShopRepository {
    state: Mutex<State>,
}

impl MemoryShopRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a store's preference record while keeping the store, so reads
    /// fall back to defaults. Used to exercise the "no stored record" path.
    pub async fn clear_preferences(&self, store_id: DbId) {
        self.state.lock().await.preferences.remove(&store_id);
    }
}

#[async_trait]
impl ShopRepository for MemoryShopRepository {
    async fn create_store(&self, input: &CreateStore) -> StoreResult<Store> {
        let mut state = self.state.lock().await;

        if state
            .stores
            .values()
            .any(|s| s.shop_domain == input.shop_domain)
        {
            return Err(StoreError::Conflict(format!(
                "A store with shop_domain '{}' already exists",
                input.shop_domain
            )));
        }

        state.next_store_id += 1;
        let now = Utc::now();
        let store = Store {
            id: state.next_store_id,
            shop_domain: input.shop_domain.clone(),
            name: input.name.clone(),
            created_at: now,
            updated_at: now,
        };
        state.stores.insert(store.id, store.clone());
        state
            .preferences
            .insert(store.id, PromptPreferences::default());
        Ok(store)
    }

    async fn get_store(&self, store_id: DbId) -> StoreResult<Store> {
        let state = self.state.lock().await;
        state
            .stores
            .get(&store_id)
            .cloned()
            .ok_or_else(|| StoreError::store_not_found(store_id))
    }

    async fn delete_store(&self, store_id: DbId) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        if state.stores.remove(&store_id).is_none() {
            return Err(StoreError::store_not_found(store_id));
        }
        state.products.retain(|_, p| p.store_id != store_id);
        state.preferences.remove(&store_id);
        state.attempts.retain(|a| a.store_id != store_id);
        Ok(())
    }

    async fn upsert_product(&self, store_id: DbId, input: &UpsertProduct) -> StoreResult<Product> {
        let mut state = self.state.lock().await;
        state.ensure_store(store_id)?;

        let now = Utc::now();
        let existing = state
            .products
            .values_mut()
            .find(|p| p.store_id == store_id && p.shopify_product_id == input.shopify_product_id);

        if let Some(product) = existing {
            product.title = input.title.clone();
            product.description = input.description.clone();
            product.handle = input.handle.clone();
            product.vendor = input.vendor.clone();
            product.product_type = input.product_type.clone();
            product.tags = input.tags.clone();
            product.updated_at = now;
            return Ok(product.clone());
        }

        state.next_product_id += 1;
        let product = Product {
            id: state.next_product_id,
            store_id,
            shopify_product_id: input.shopify_product_id.clone(),
            title: input.title.clone(),
            description: input.description.clone(),
            handle: input.handle.clone(),
            vendor: input.vendor.clone(),
            product_type: input.product_type.clone(),
            tags: input.tags.clone(),
            created_at: now,
            updated_at: now,
        };
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get_product(&self, store_id: DbId, product_id: DbId) -> StoreResult<Product> {
        let state = self.state.lock().await;
        state.ensure_store(store_id)?;
        state
            .products
            .get(&product_id)
            .filter(|p| p.store_id == store_id)
            .cloned()
            .ok_or_else(|| StoreError::product_not_found(product_id))
    }

    async fn list_products(
        &self,
        store_id: DbId,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Product>> {
        let state = self.state.lock().await;
        state.ensure_store(store_id)?;
        Ok(state
            .products
            .values()
            .filter(|p| p.store_id == store_id)
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn find_preferences(&self, store_id: DbId) -> StoreResult<Option<PromptPreferences>> {
        let state = self.state.lock().await;
        state.ensure_store(store_id)?;
        Ok(state.preferences.get(&store_id).cloned())
    }

    async fn update_preferences(
        &self,
        store_id: DbId,
        update: &PromptPreferencesUpdate,
    ) -> StoreResult<PromptPreferences> {
        let mut state = self.state.lock().await;
        state.ensure_store(store_id)?;

        let next = state
            .preferences
            .get(&store_id)
            .cloned()
            .unwrap_or_default()
            .merged(update);
        state.preferences.insert(store_id, next.clone());
        Ok(next)
    }

    async fn record_attempt(&self, attempt: &NewOptimizationAttempt) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        state.ensure_store(attempt.store_id)?;
        if !state
            .products
            .get(&attempt.product_id)
            .is_some_and(|p| p.store_id == attempt.store_id)
        {
            return Err(StoreError::product_not_found(attempt.product_id));
        }

        state.next_attempt_id += 1;
        let record = OptimizationAttempt {
            id: state.next_attempt_id,
            store_id: attempt.store_id,
            product_id: attempt.product_id,
            error_kind: attempt
                .error_kind
                .map(GenerationErrorKind::as_str)
                .map(str::to_string),
            elapsed_ms: attempt.elapsed_ms,
            created_at: Utc::now(),
        };
        state.attempts.push(record);
        Ok(())
    }

    async fn list_attempts(
        &self,
        store_id: DbId,
        since: Timestamp,
    ) -> StoreResult<Vec<OptimizationAttempt>> {
        let state = self.state.lock().await;
        state.ensure_store(store_id)?;
        Ok(state
            .attempts
            .iter()
            .filter(|a| a.store_id == store_id && a.created_at >= since)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
