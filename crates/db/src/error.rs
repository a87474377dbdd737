use shopseo_core::types::DbId;

/// Errors from a [`crate::ShopRepository`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn store_not_found(id: DbId) -> Self {
        StoreError::NotFound { entity: "Store", id }
    }

    pub fn product_not_found(id: DbId) -> Self {
        StoreError::NotFound {
            entity: "Product",
            id,
        }
    }

    /// Whether the failure means storage is unreachable rather than that the
    /// request was wrong. Callers may retry these with backoff.
    pub fn is_unavailable(&self) -> bool {
        match self {
            StoreError::Database(err) => matches!(
                err,
                sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
                    | sqlx::Error::WorkerCrashed
            ),
            _ => false,
        }
    }
}
