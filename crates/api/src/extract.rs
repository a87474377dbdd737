//! Path and query extractors that reject with the JSON error envelope.
//!
//! Axum's own `Path` and `Query` reject with a plain-text body. These
//! wrappers turn the rejection into a `VALIDATION_ERROR` so every error the
//! API returns has the same shape.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use shopseo_core::error::CoreError;

use crate::error::AppError;

/// Typed path parameters, e.g. `Path((store_id, product_id))`.
#[derive(Debug)]
pub struct Path<T>(pub T);

impl<S, T> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Path(value)) => Ok(Path(value)),
            Err(rejection) => Err(AppError::Core(CoreError::Validation(format!(
                "Invalid path parameter: {}",
                rejection.body_text()
            )))),
        }
    }
}

/// Typed query string, e.g. `Query(PaginationParams)`.
#[derive(Debug)]
pub struct Query<T>(pub T);

impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Query(value)) => Ok(Query(value)),
            Err(rejection) => Err(AppError::Core(CoreError::Validation(format!(
                "Invalid query string: {}",
                rejection.body_text()
            )))),
        }
    }
}
