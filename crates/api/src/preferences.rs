//! Preference Store: read, validate and save per-store prompt preferences.

use std::sync::Arc;

use serde_json::Value;
use shopseo_core::options::OptionsCatalog;
use shopseo_core::preferences::{PromptPreferences, PromptPreferencesUpdate};
use shopseo_core::types::DbId;
use shopseo_db::ShopRepository;

use crate::error::AppResult;

pub struct PreferenceStore {
    repo: Arc<dyn ShopRepository>,
    catalog: Arc<OptionsCatalog>,
}

impl PreferenceStore {
    pub fn new(repo: Arc<dyn ShopRepository>, catalog: Arc<OptionsCatalog>) -> Self {
        Self { repo, catalog }
    }

    /// The options catalog every enum field is validated against.
    pub fn catalog(&self) -> &OptionsCatalog {
        &self.catalog
    }

    /// Stored preferences, or the defaults when the store has none.
    pub async fn get(&self, store_id: DbId) -> AppResult<PromptPreferences> {
        Ok(self
            .repo
            .find_preferences(store_id)
            .await?
            .unwrap_or_default())
    }

    /// Validate a partial update and merge it into the stored record.
    ///
    /// Nothing is written unless the whole update is valid.
    pub async fn save(&self, store_id: DbId, body: Value) -> AppResult<PromptPreferences> {
        let update = PromptPreferencesUpdate::from_json(body)?;
        update.validate(&self.catalog)?;

        let saved = self.repo.update_preferences(store_id, &update).await?;
        tracing::info!(
            store_id,
            fields = ?update.present_fields(),
            "Prompt preferences saved"
        );
        Ok(saved)
    }
}
