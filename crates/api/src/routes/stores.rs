//! Store routes, mounted at `/stores`.
//!
//! ```text
//! POST   /                  create_store
//! GET    /{store_id}        get_store
//! DELETE /{store_id}        delete_store
//! GET    /{store_id}/analytics  get_metrics
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{analytics, stores};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(stores::create_store))
        .route(
            "/{store_id}",
            get(stores::get_store).delete(stores::delete_store),
        )
        .route("/{store_id}/analytics", get(analytics::get_metrics))
}
