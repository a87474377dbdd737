//! Repository for the `optimization_attempts` table.

use shopseo_core::analytics::{NewOptimizationAttempt, OptimizationAttempt};
use shopseo_core::generation::GenerationErrorKind;
use shopseo_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::optimization_attempt::OptimizationAttemptRow;

/// Column list for optimization attempt queries.
const COLUMNS: &str = "id, store_id, product_id, error_kind, elapsed_ms, created_at";

/// Append-only log of generation attempts.
pub struct OptimizationAttemptRepo;

impl OptimizationAttemptRepo {
    pub async fn create(pool: &PgPool, attempt: &NewOptimizationAttempt) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO optimization_attempts (store_id, product_id, error_kind, elapsed_ms)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(attempt.store_id)
        .bind(attempt.product_id)
        .bind(attempt.error_kind.map(GenerationErrorKind::as_str))
        .bind(attempt.elapsed_ms)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// A store's attempts created at or after `since`, oldest first.
    pub async fn list_since(
        pool: &PgPool,
        store_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<OptimizationAttempt>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM optimization_attempts
             WHERE store_id = $1 AND created_at >= $2
             ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, OptimizationAttemptRow>(&query)
            .bind(store_id)
            .bind(since)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(OptimizationAttempt::from).collect())
    }
}
