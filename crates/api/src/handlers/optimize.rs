//! Handlers for description optimization.
//!
//! Results are returned to the caller only; the stored product is never
//! modified.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use shopseo_core::optimization::OptimizeOverrides;
use shopseo_core::types::DbId;

use crate::error::AppResult;
use crate::extract::Path;
use crate::response::{OptimizeAllResponse, ProductResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /stores/{store_id}/products/{product_id}/optimize
// ---------------------------------------------------------------------------

pub async fn optimize_product(
    State(state): State<AppState>,
    Path((store_id, product_id)): Path<(DbId, DbId)>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let overrides = OptimizeOverrides::from_slice(&body)?;
    let product = state
        .gateway
        .optimize(store_id, product_id, &overrides)
        .await?;
    Ok(Json(ProductResponse { product }))
}

// ---------------------------------------------------------------------------
// POST /stores/{store_id}/products/optimize-all
// ---------------------------------------------------------------------------

/// Optimize every product of the store. Responds 207 when any product
/// failed; the failures are listed under `errors`.
pub async fn optimize_all(
    State(state): State<AppState>,
    Path(store_id): Path<DbId>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let overrides = OptimizeOverrides::from_slice(&body)?;
    let outcome = state.gateway.optimize_all(store_id, &overrides).await?;

    let status = if outcome.has_failures() {
        StatusCode::MULTI_STATUS
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(OptimizeAllResponse {
            products: outcome.products,
            errors: outcome.errors,
        }),
    ))
}
