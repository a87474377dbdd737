//! Repository for the `prompt_preferences` table.
//!
//! Preferences are stored as one JSONB document per store. Saves run as a
//! read-merge-write inside a transaction that holds the store row lock, so
//! concurrent saves for the same store apply one after the other.

use shopseo_core::preferences::{PromptPreferences, PromptPreferencesUpdate};
use shopseo_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

/// Provides read and atomic partial update of prompt preferences.
pub struct PromptPreferencesRepo;

impl PromptPreferencesRepo {
    /// Fetch the stored preferences for a store, if any.
    pub async fn find_by_store(
        pool: &PgPool,
        store_id: DbId,
    ) -> Result<Option<PromptPreferences>, sqlx::Error> {
        let row: Option<Json<PromptPreferences>> =
            sqlx::query_scalar("SELECT preferences FROM prompt_preferences WHERE store_id = $1")
                .bind(store_id)
                .fetch_optional(pool)
                .await?;
        Ok(row.map(|Json(prefs)| prefs))
    }

    /// Merge `update` into the stored preferences and persist the result.
    ///
    /// Returns `None` if the store does not exist. A store without a
    /// preferences row starts from the defaults.
    pub async fn apply_update(
        pool: &PgPool,
        store_id: DbId,
        update: &PromptPreferencesUpdate,
    ) -> Result<Option<PromptPreferences>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<DbId> = sqlx::query_scalar("SELECT id FROM stores WHERE id = $1 FOR UPDATE")
            .bind(store_id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let current: Option<Json<PromptPreferences>> =
            sqlx::query_scalar("SELECT preferences FROM prompt_preferences WHERE store_id = $1")
                .bind(store_id)
                .fetch_optional(&mut *tx)
                .await?;

        if current.is_none() {
            tracing::debug!(store_id, "No stored preferences, merging into defaults");
        }
        let next = current
            .map(|Json(prefs)| prefs)
            .unwrap_or_default()
            .merged(update);

        sqlx::query(
            "INSERT INTO prompt_preferences (store_id, preferences)
             VALUES ($1, $2)
             ON CONFLICT (store_id) DO UPDATE SET
                preferences = EXCLUDED.preferences,
                updated_at  = NOW()",
        )
        .bind(store_id)
        .bind(Json(&next))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(next))
    }
}
