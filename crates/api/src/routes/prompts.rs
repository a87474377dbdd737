//! Prompt routes.
//!
//! Provides two routers:
//! - `options_router()` mounted at `/prompts`
//! - `store_router()` mounted at `/stores/{store_id}/prompts`
//!
//! ```text
//! OPTIONS CATALOG:
//! GET    /options                   list_options
//!
//! PER STORE:
//! GET    /preferences               get_preferences
//! PUT    /preferences               save_preferences
//! POST   /preview                   preview_prompt
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::prompts;
use crate::state::AppState;

/// Global catalog routes, mounted at `/prompts`.
pub fn options_router() -> Router<AppState> {
    Router::new().route("/options", get(prompts::list_options))
}

/// Store-scoped prompt routes, mounted at `/stores/{store_id}/prompts`.
pub fn store_router() -> Router<AppState> {
    Router::new()
        .route(
            "/preferences",
            get(prompts::get_preferences).put(prompts::save_preferences),
        )
        .route("/preview", post(prompts::preview_prompt))
}
