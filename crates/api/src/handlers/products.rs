//! Handlers for the store-scoped product catalog snapshot.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use shopseo_core::merchant::{self, clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use shopseo_core::types::DbId;
use shopseo_db::models::product::UpsertProduct;

use crate::error::AppResult;
use crate::extract::{Path, Query};
use crate::handlers::parse_json;
use crate::query::PaginationParams;
use crate::response::{ProductResponse, ProductsResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /stores/{store_id}/products
// ---------------------------------------------------------------------------

pub async fn list_products(
    State(state): State<AppState>,
    Path(store_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let products = state.repo.list_products(store_id, limit, offset).await?;
    tracing::debug!(store_id, count = products.len(), "Listed products");
    Ok(Json(ProductsResponse { products }))
}

// ---------------------------------------------------------------------------
// PUT /stores/{store_id}/products
// ---------------------------------------------------------------------------

/// Insert or refresh one product snapshot from a catalog sync.
pub async fn upsert_product(
    State(state): State<AppState>,
    Path(store_id): Path<DbId>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let input: UpsertProduct = parse_json(&body)?;
    merchant::validate_product(&input.shopify_product_id, &input.title)?;

    let product = state.repo.upsert_product(store_id, &input).await?;
    tracing::info!(
        store_id,
        product_id = product.id,
        shopify_product_id = %product.shopify_product_id,
        "Product synced"
    );
    Ok(Json(ProductResponse { product }))
}

// ---------------------------------------------------------------------------
// GET /stores/{store_id}/products/{product_id}
// ---------------------------------------------------------------------------

pub async fn get_product(
    State(state): State<AppState>,
    Path((store_id, product_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let product = state.repo.get_product(store_id, product_id).await?;
    Ok(Json(ProductResponse { product }))
}
