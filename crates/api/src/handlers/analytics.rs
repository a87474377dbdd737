//! Handler for per-store optimization analytics.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

use shopseo_core::analytics::{OptimizationMetrics, Timeframe};
use shopseo_core::types::DbId;

use crate::error::AppResult;
use crate::extract::{Path, Query};
use crate::query::AnalyticsParams;
use crate::response::AnalyticsResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /stores/{store_id}/analytics
// ---------------------------------------------------------------------------

/// Attempts, success rate, failures by kind, and average latency of the
/// store's description generations over a trailing window.
pub async fn get_metrics(
    State(state): State<AppState>,
    Path(store_id): Path<DbId>,
    Query(params): Query<AnalyticsParams>,
) -> AppResult<impl IntoResponse> {
    let timeframe = Timeframe::parse(params.timeframe.as_deref())?;
    let end = Utc::now();

    let attempts = state
        .repo
        .list_attempts(store_id, end - timeframe.span())
        .await?;
    let metrics = OptimizationMetrics::summarize(timeframe, end, &attempts);

    tracing::debug!(
        store_id,
        timeframe = timeframe.as_str(),
        total_attempts = metrics.total_attempts,
        "Computed optimization metrics"
    );
    Ok(Json(AnalyticsResponse { metrics }))
}
