//! Repository for the `stores` table.

use shopseo_core::preferences::PromptPreferences;
use shopseo_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::store::{CreateStore, Store};

/// Column list for stores queries.
const COLUMNS: &str = "id, shop_domain, name, created_at, updated_at";

/// Provides onboarding, lookup and offboarding for stores.
pub struct StoreRepo;

impl StoreRepo {
    /// Insert a store together with its default prompt preferences, in one
    /// transaction. Returns the created row.
    pub async fn create(pool: &PgPool, input: &CreateStore) -> Result<Store, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO stores (shop_domain, name)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        let store = sqlx::query_as::<_, Store>(&query)
            .bind(&input.shop_domain)
            .bind(&input.name)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO prompt_preferences (store_id, preferences) VALUES ($1, $2)")
            .bind(store.id)
            .bind(Json(PromptPreferences::default()))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(store)
    }

    /// Find a store by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Store>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stores WHERE id = $1");
        sqlx::query_as::<_, Store>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a store. Products and preferences cascade. Returns `true` if a
    /// row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM stores WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
