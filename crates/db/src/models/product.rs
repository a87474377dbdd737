//! Product models and DTOs.

use serde::{Deserialize, Serialize};
use shopseo_core::optimization::ProductContext;
use shopseo_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `products` table: the local snapshot of a Shopify product.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: DbId,
    pub store_id: DbId,
    pub shopify_product_id: String,
    pub title: String,
    pub description: Option<String>,
    pub handle: Option<String>,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Product {
    /// The attributes that feed into a generation prompt.
    pub fn context(&self) -> ProductContext {
        ProductContext {
            title: self.title.clone(),
            description: self.description.clone(),
            product_type: self.product_type.clone(),
            vendor: self.vendor.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// A product snapshot from a catalog sync. Keyed by `shopify_product_id`
/// within the store; an existing row is overwritten.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertProduct {
    pub shopify_product_id: String,
    pub title: String,
    pub description: Option<String>,
    pub handle: Option<String>,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}
