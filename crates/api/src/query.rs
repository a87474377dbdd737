//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the handler via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Analytics window (`?timeframe=last_7_days`). Absent means 30 days.
#[derive(Debug, Deserialize)]
pub struct AnalyticsParams {
    pub timeframe: Option<String>,
}
