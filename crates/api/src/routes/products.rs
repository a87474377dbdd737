//! Product routes, mounted at `/stores/{store_id}/products`.
//!
//! ```text
//! GET    /                          list_products
//! PUT    /                          upsert_product
//! GET    /{product_id}              get_product
//! POST   /{product_id}/optimize     optimize_product
//! ```
//!
//! Optimize-all runs under its own batch deadline instead of the request
//! timeout, so it is mounted separately by [`batch_router`].

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{optimize, products};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(products::list_products).put(products::upsert_product),
        )
        .route("/{product_id}", get(products::get_product))
        .route("/{product_id}/optimize", post(optimize::optimize_product))
}

/// `POST /api/stores/{store_id}/products/optimize-all`, at its full path so
/// the app router can mount it outside the request timeout.
pub fn batch_router() -> Router<AppState> {
    Router::new().route(
        "/api/stores/{store_id}/products/optimize-all",
        post(optimize::optimize_all),
    )
}
