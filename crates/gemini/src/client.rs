//! HTTP client for the Gemini `generateContent` endpoint.

use async_trait::async_trait;
use shopseo_core::generation::{
    DescriptionGenerator, GenerationError, GenerationErrorKind, GenerationRequest,
};

use crate::config::GeminiConfig;
use crate::messages::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse};

/// Errors from the Gemini REST layer.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    /// No API key is configured.
    #[error("Gemini API key is not configured")]
    MissingApiKey,

    /// The HTTP request itself failed (network, DNS, TLS, timeout, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Gemini returned a non-2xx status code.
    #[error("Gemini API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// The prompt or the output was blocked on policy grounds.
    #[error("Gemini blocked the request ({0})")]
    Blocked(String),

    /// A 2xx response without any usable text.
    #[error("Gemini returned no text")]
    EmptyResponse,
}

impl GeminiError {
    /// Map the failure onto the provider-neutral error kinds.
    pub fn kind(&self) -> GenerationErrorKind {
        match self {
            GeminiError::MissingApiKey => GenerationErrorKind::Rejected,
            GeminiError::Request(err) => classify_transport_error(err),
            GeminiError::ApiError { status, .. } => classify_status(*status),
            GeminiError::Blocked(_) => GenerationErrorKind::ContentPolicy,
            GeminiError::EmptyResponse => GenerationErrorKind::MalformedOutput,
        }
    }
}

impl From<GeminiError> for GenerationError {
    fn from(err: GeminiError) -> Self {
        GenerationError::new(err.kind(), err.to_string())
    }
}

/// Classify a non-2xx status from Gemini.
pub fn classify_status(status: u16) -> GenerationErrorKind {
    match status {
        408 | 504 => GenerationErrorKind::Timeout,
        429 => GenerationErrorKind::RateLimited,
        500..=599 => GenerationErrorKind::Unavailable,
        _ => GenerationErrorKind::Rejected,
    }
}

fn classify_transport_error(err: &reqwest::Error) -> GenerationErrorKind {
    if err.is_timeout() {
        GenerationErrorKind::Timeout
    } else if err.is_decode() {
        GenerationErrorKind::MalformedOutput
    } else if let Some(status) = err.status() {
        classify_status(status.as_u16())
    } else {
        GenerationErrorKind::Unavailable
    }
}

/// [`DescriptionGenerator`] backed by Gemini.
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Build a client whose requests are bounded by `config.timeout`.
    pub fn new(config: GeminiConfig) -> Result<Self, GeminiError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Send one `generateContent` call and return the first candidate's text.
    pub async fn generate_content(
        &self,
        prompt: &str,
        temperature: f32,
        max_output_tokens: u32,
    ) -> Result<String, GeminiError> {
        if !self.config.has_api_key() {
            return Err(GeminiError::MissingApiKey);
        }

        let body = GenerateContentRequest::from_prompt(prompt, temperature, max_output_tokens);
        let response = self
            .client
            .post(self.config.generate_url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let parsed: GenerateContentResponse = response.json().await?;

        if let Some(reason) = parsed.policy_block() {
            return Err(GeminiError::Blocked(reason));
        }

        match parsed.first_text() {
            Some(text) if !text.trim().is_empty() => {
                if let Some(reason) = parsed
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.as_deref())
                    .filter(|r| *r == "MAX_TOKENS")
                {
                    tracing::warn!(model = %self.config.model, reason, "Gemini output truncated");
                }
                Ok(text)
            }
            _ => Err(GeminiError::EmptyResponse),
        }
    }

    // ---- private helpers ----

    /// Return the response unchanged on success, or an
    /// [`GeminiError::ApiError`] carrying the provider's message.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GeminiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|env| env.error.message)
            .unwrap_or(body);
        Err(GeminiError::ApiError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl DescriptionGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.generate_content(
            &request.prompt,
            request.temperature,
            request.max_output_tokens,
        )
        .await
        .map_err(|err| {
            tracing::warn!(model = %self.config.model, error = %err, "Gemini call failed");
            GenerationError::from(err)
        })
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn rate_limit_status_is_rate_limited() {
        assert_eq!(classify_status(429), GenerationErrorKind::RateLimited);
    }

    #[test]
    fn server_errors_are_unavailable() {
        for status in [500, 502, 503] {
            assert_eq!(classify_status(status), GenerationErrorKind::Unavailable);
        }
    }

    #[test]
    fn gateway_timeout_is_timeout() {
        assert_eq!(classify_status(504), GenerationErrorKind::Timeout);
    }

    #[test]
    fn client_errors_are_rejected() {
        for status in [400, 401, 403, 404] {
            assert_eq!(classify_status(status), GenerationErrorKind::Rejected);
        }
    }

    #[test]
    fn blocked_maps_to_non_retryable_content_policy() {
        let err: GenerationError = GeminiError::Blocked("prompt blocked: SAFETY".into()).into();
        assert_eq!(err.kind, GenerationErrorKind::ContentPolicy);
        assert!(!err.retryable());
    }

    #[test]
    fn empty_response_is_retryable_malformed_output() {
        let err: GenerationError = GeminiError::EmptyResponse.into();
        assert_eq!(err.kind, GenerationErrorKind::MalformedOutput);
        assert!(err.retryable());
    }

    #[test]
    fn missing_key_is_rejected() {
        assert_eq!(GeminiError::MissingApiKey.kind(), GenerationErrorKind::Rejected);
    }

    #[tokio::test]
    async fn missing_key_short_circuits_before_sending() {
        let client = GeminiClient::new(GeminiConfig::default()).unwrap();
        let err = client.generate_content("Describe a mug", 0.7, 64).await.unwrap_err();
        assert_matches!(err, GeminiError::MissingApiKey);
    }
}
