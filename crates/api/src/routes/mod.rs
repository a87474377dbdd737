pub mod health;
pub mod products;
pub mod prompts;
pub mod stores;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /prompts/options                                  options catalog (GET)
///
/// /stores                                           onboard (POST)
/// /stores/{store_id}                                get, offboard
/// /stores/{store_id}/analytics                      optimization metrics (GET)
///
/// /stores/{store_id}/products                       list, sync upsert (PUT)
/// /stores/{store_id}/products/{product_id}          get
/// /stores/{store_id}/products/{product_id}/optimize optimize one product (POST)
///
/// /stores/{store_id}/prompts/preferences            get, save (PUT)
/// /stores/{store_id}/prompts/preview                render prompt (POST)
/// ```
///
/// `POST /stores/{store_id}/products/optimize-all` is mounted by the app
/// router, outside the request timeout.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/prompts", prompts::options_router())
        .nest("/stores", stores::router())
        .nest("/stores/{store_id}/products", products::router())
        .nest("/stores/{store_id}/prompts", prompts::store_router())
}
