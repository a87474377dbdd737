use crate::generation::GenerationError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    /// An enum-valued field carried a value outside the options catalog.
    #[error("Invalid value '{value}' for {field}. Must be one of: {}", allowed.join(", "))]
    InvalidOption {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Build an [`CoreError::InvalidOption`] from a catalog slice.
    pub fn invalid_option(field: &str, value: &str, allowed: &[String]) -> Self {
        CoreError::InvalidOption {
            field: field.to_string(),
            value: value.to_string(),
            allowed: allowed.to_vec(),
        }
    }
}
