use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-pro";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Gemini provider settings.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key`. Empty means generation is disabled
    /// and every call fails as rejected.
    pub api_key: String,
    pub model: String,
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Upper bound on one `generateContent` call.
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                                     |
    /// |---------------------------|---------------------------------------------|
    /// | `GEMINI_API_KEY`          | (empty)                                     |
    /// | `GEMINI_MODEL`            | `gemini-pro`                                |
    /// | `GEMINI_BASE_URL`         | `https://generativelanguage.googleapis.com` |
    /// | `GENERATION_TIMEOUT_SECS` | `30`                                        |
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();

        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let base_url = std::env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs: u64 = std::env::var("GENERATION_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("GENERATION_TIMEOUT_SECS must be a valid u64");

        Self {
            api_key,
            model,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Full URL of the `generateContent` endpoint for the configured model.
    pub fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
