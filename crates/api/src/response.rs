//! Response envelope types for API handlers.
//!
//! Each resource is wrapped under its own key (`{ "store": ... }`,
//! `{ "prompt_preferences": ... }`), which is the shape the merchant UI
//! reads.

use serde::Serialize;
use shopseo_core::analytics::OptimizationMetrics;
use shopseo_core::optimization::OptimizationResult;
use shopseo_core::preferences::PromptPreferences;
use shopseo_core::types::{DbId, Timestamp};
use shopseo_db::models::product::Product;
use shopseo_db::models::store::Store;

#[derive(Debug, Serialize)]
pub struct StoreResponse {
    pub store: Store,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse<T: Serialize> {
    pub product: T,
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    pub prompt_preferences: PromptPreferences,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub metrics: OptimizationMetrics,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub preview: String,
}

/// A product with its freshly generated description. Not persisted.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizedProduct {
    pub id: DbId,
    pub title: String,
    pub original_description: String,
    pub optimized_description: String,
    pub generated_at: Timestamp,
}

impl OptimizedProduct {
    pub fn new(title: String, result: OptimizationResult) -> Self {
        Self {
            id: result.product_id,
            title,
            original_description: result.original_description,
            optimized_description: result.optimized_description,
            generated_at: result.generated_at,
        }
    }
}

/// One product that could not be optimized during optimize-all.
#[derive(Debug, Clone, Serialize)]
pub struct ProductFailure {
    pub product_id: DbId,
    pub title: String,
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct OptimizeAllResponse {
    pub products: Vec<OptimizedProduct>,
    pub errors: Vec<ProductFailure>,
}
