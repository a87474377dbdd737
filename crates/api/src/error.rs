use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use shopseo_core::error::CoreError;
use shopseo_core::generation::{GenerationError, GenerationErrorKind};
use shopseo_db::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for storage
/// errors. Implements [`IntoResponse`] to produce
/// `{ "error", "code", "details"? }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `shopseo_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An error from the storage backend.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        AppError::Core(CoreError::Generation(err))
    }
}

/// The pieces of an error response before serialization.
#[derive(Debug)]
pub struct ErrorParts {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
}

impl ErrorParts {
    fn new(status: StatusCode, code: &'static str, message: String) -> Self {
        Self {
            status,
            code,
            message,
            details: None,
        }
    }

    fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An internal error occurred".to_string(),
        )
    }

    /// `{ "error", "code", "details"? }`.
    pub fn body(&self) -> Value {
        let mut body = json!({
            "error": self.message,
            "code": self.code,
        });
        if let Some(ref details) = self.details {
            body["details"] = details.clone();
        }
        body
    }
}

impl AppError {
    /// Classify this error into status, code, message and details.
    ///
    /// Internal failures are logged here and their messages sanitized.
    pub fn parts(&self) -> ErrorParts {
        match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    ErrorParts::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::InvalidOption { field, allowed, .. } => ErrorParts::new(
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    core.to_string(),
                )
                .with_details(json!({ "field": field, "allowed": allowed })),
                CoreError::Generation(err) => classify_generation_error(err),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    ErrorParts::internal()
                }
            },

            // --- Storage errors ---
            AppError::Store(err) => classify_store_error(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let parts = self.parts();
        (parts.status, axum::Json(parts.body())).into_response()
    }
}

/// Provider timeouts map to 504; every other generation failure to 502.
fn classify_generation_error(err: &GenerationError) -> ErrorParts {
    let status = match err.kind {
        GenerationErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    };
    ErrorParts::new(status, "GENERATION_ERROR", err.to_string()).with_details(json!({
        "kind": err.kind,
        "retryable": err.retryable(),
    }))
}

/// Classify a storage error into an HTTP response.
///
/// - `NotFound` maps to 404 and `Conflict` to 409.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Unreachable storage maps to 503 `PERSISTENCE_ERROR`, retryable.
/// - Everything else maps to 500 with a sanitized message.
fn classify_store_error(err: &StoreError) -> ErrorParts {
    match err {
        StoreError::NotFound { entity, id } => ErrorParts::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        StoreError::Conflict(msg) => {
            ErrorParts::new(StatusCode::CONFLICT, "CONFLICT", msg.clone())
        }
        StoreError::Database(db) if err.is_unavailable() => {
            tracing::error!(error = %db, "Storage unavailable");
            ErrorParts::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "PERSISTENCE_ERROR",
                "Storage is temporarily unavailable".to_string(),
            )
            .with_details(json!({ "retryable": true }))
        }
        StoreError::Database(db) => classify_sqlx_error(db),
    }
}

fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    match err {
        sqlx::Error::RowNotFound => ErrorParts::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return ErrorParts::new(
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            ErrorParts::internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            ErrorParts::internal()
        }
    }
}
