//! Request handlers.
//!
//! Handlers read raw bodies and parse them here, so malformed JSON produces
//! the same `VALIDATION_ERROR` envelope as any other invalid input.

pub mod analytics;
pub mod optimize;
pub mod products;
pub mod prompts;
pub mod stores;

use axum::body::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shopseo_core::error::CoreError;

use crate::error::AppResult;

/// Parse a JSON request body into `T`.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &Bytes) -> AppResult<T> {
    serde_json::from_slice(body)
        .map_err(|e| CoreError::Validation(format!("Invalid request body: {e}")).into())
}

/// Parse a JSON request body without committing to a shape.
pub(crate) fn parse_json_value(body: &Bytes) -> AppResult<Value> {
    parse_json(body)
}
