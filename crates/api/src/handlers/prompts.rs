//! Handlers for prompt preferences, the options catalog and prompt preview.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use shopseo_core::optimization::PromptPreviewRequest;
use shopseo_core::types::DbId;

use crate::error::AppResult;
use crate::extract::Path;
use crate::handlers::parse_json_value;
use crate::response::{PreferencesResponse, PreviewResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /stores/{store_id}/prompts/preferences
// ---------------------------------------------------------------------------

pub async fn get_preferences(
    State(state): State<AppState>,
    Path(store_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let prompt_preferences = state.preferences.get(store_id).await?;
    Ok(Json(PreferencesResponse { prompt_preferences }))
}

// ---------------------------------------------------------------------------
// PUT /stores/{store_id}/prompts/preferences
// ---------------------------------------------------------------------------

/// Save a partial update; absent fields keep their stored values.
pub async fn save_preferences(
    State(state): State<AppState>,
    Path(store_id): Path<DbId>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let body = parse_json_value(&body)?;
    let prompt_preferences = state.preferences.save(store_id, body).await?;
    Ok(Json(PreferencesResponse { prompt_preferences }))
}

// ---------------------------------------------------------------------------
// GET /prompts/options
// ---------------------------------------------------------------------------

pub async fn list_options(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.preferences.catalog().clone())
}

// ---------------------------------------------------------------------------
// POST /stores/{store_id}/prompts/preview
// ---------------------------------------------------------------------------

pub async fn preview_prompt(
    State(state): State<AppState>,
    Path(store_id): Path<DbId>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let request = PromptPreviewRequest::from_slice(&body)?;
    let preview = state.gateway.preview(store_id, &request).await?;
    Ok(Json(PreviewResponse { preview }))
}
