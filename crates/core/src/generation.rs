//! Contract between the optimization gateway and a description generator.
//!
//! A generator turns a fully rendered prompt into text. It performs no
//! retries; every failure is classified into a [`GenerationErrorKind`] so the
//! caller can tell transient conditions from permanent rejections.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

/// A single generation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    /// Fully rendered prompt text.
    pub prompt: String,
    /// Upper bound on the generated output, in provider tokens.
    pub max_output_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// Why a generation call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationErrorKind {
    /// The provider did not answer within the configured deadline.
    Timeout,
    /// The provider throttled the request.
    RateLimited,
    /// Network failure or a 5xx from the provider.
    Unavailable,
    /// The provider answered but the output was unusable.
    MalformedOutput,
    /// The provider refused on safety or policy grounds.
    ContentPolicy,
    /// The product carries nothing to work from.
    InvalidInput,
    /// The provider rejected the request itself (bad key, bad model, 4xx).
    Rejected,
}

impl GenerationErrorKind {
    /// Whether retrying the same request later may succeed.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            GenerationErrorKind::Timeout
                | GenerationErrorKind::RateLimited
                | GenerationErrorKind::Unavailable
                | GenerationErrorKind::MalformedOutput
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GenerationErrorKind::Timeout => "timeout",
            GenerationErrorKind::RateLimited => "rate_limited",
            GenerationErrorKind::Unavailable => "unavailable",
            GenerationErrorKind::MalformedOutput => "malformed_output",
            GenerationErrorKind::ContentPolicy => "content_policy",
            GenerationErrorKind::InvalidInput => "invalid_input",
            GenerationErrorKind::Rejected => "rejected",
        }
    }
}

impl fmt::Display for GenerationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified generation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Generation failed ({kind}): {message}")]
pub struct GenerationError {
    pub kind: GenerationErrorKind,
    pub message: String,
}

impl GenerationError {
    pub fn new(kind: GenerationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Timeout, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::RateLimited, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Unavailable, message)
    }

    pub fn malformed_output(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::MalformedOutput, message)
    }

    pub fn content_policy(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::ContentPolicy, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::InvalidInput, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Rejected, message)
    }

    pub fn retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// A text generation backend.
#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    /// Generate text for `request`. Must not retry internally.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    /// Short provider name for logs.
    fn provider_name(&self) -> &'static str;
}
