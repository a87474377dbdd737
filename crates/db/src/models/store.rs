//! Store models and DTOs.

use serde::{Deserialize, Serialize};
use shopseo_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `stores` table: one connected Shopify shop.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Store {
    pub id: DbId,
    pub shop_domain: String,
    pub name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for onboarding a store.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStore {
    pub shop_domain: String,
    pub name: Option<String>,
}
