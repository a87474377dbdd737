//! Optimization attempt rows.

use shopseo_core::analytics::OptimizationAttempt;
use shopseo_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `optimization_attempts` table.
#[derive(Debug, Clone, FromRow)]
pub struct OptimizationAttemptRow {
    pub id: DbId,
    pub store_id: DbId,
    pub product_id: DbId,
    pub error_kind: Option<String>,
    pub elapsed_ms: i64,
    pub created_at: Timestamp,
}

impl From<OptimizationAttemptRow> for OptimizationAttempt {
    fn from(row: OptimizationAttemptRow) -> Self {
        OptimizationAttempt {
            id: row.id,
            store_id: row.store_id,
            product_id: row.product_id,
            error_kind: row.error_kind,
            elapsed_ms: row.elapsed_ms,
            created_at: row.created_at,
        }
    }
}
