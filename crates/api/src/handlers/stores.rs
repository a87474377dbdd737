//! Handlers for store onboarding and offboarding.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use shopseo_core::merchant;
use shopseo_core::types::DbId;
use shopseo_db::models::store::CreateStore;

use crate::error::AppResult;
use crate::extract::Path;
use crate::handlers::parse_json;
use crate::response::StoreResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /stores
// ---------------------------------------------------------------------------

/// Onboard a store. Its prompt preferences start at the defaults.
pub async fn create_store(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let mut input: CreateStore = parse_json(&body)?;
    input.shop_domain = input.shop_domain.trim().to_ascii_lowercase();
    merchant::validate_shop_domain(&input.shop_domain)?;

    let store = state.repo.create_store(&input).await?;
    tracing::info!(store_id = store.id, shop_domain = %store.shop_domain, "Store onboarded");
    Ok((StatusCode::CREATED, Json(StoreResponse { store })))
}

// ---------------------------------------------------------------------------
// GET /stores/{store_id}
// ---------------------------------------------------------------------------

pub async fn get_store(
    State(state): State<AppState>,
    Path(store_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let store = state.repo.get_store(store_id).await?;
    Ok(Json(StoreResponse { store }))
}

// ---------------------------------------------------------------------------
// DELETE /stores/{store_id}
// ---------------------------------------------------------------------------

/// Offboard a store. Products and preferences go with it.
pub async fn delete_store(
    State(state): State<AppState>,
    Path(store_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    state.repo.delete_store(store_id).await?;
    tracing::info!(store_id, "Store offboarded");
    Ok(StatusCode::NO_CONTENT)
}
