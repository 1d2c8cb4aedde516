//! Configuration for OpenAiBrain.

use assistant_core::CoreError;
use std::env;
use std::time::Duration;

/// Configuration for OpenAiBrain.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// OpenAI API URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Chat model name to use.
    pub model: String,

    /// Embedding model name to use.
    pub embedding_model: String,

    /// Maximum tokens for a completion.
    pub max_tokens: Option<u32>,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Request timeout. On timeout the call fails exactly as a network
    /// failure would; callers fall back, nothing is retried here.
    pub request_timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com".to_string(),
            api_key: String::new(),
            model: "o4-mini".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            max_tokens: Some(1024),
            temperature: Some(0.7),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl OpenAiConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `OPENAI_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `OPENAI_API_URL` - API URL (default: https://api.openai.com)
    /// - `OPENAI_MODEL` - Chat model (default: o4-mini)
    /// - `OPENAI_EMBEDDING_MODEL` - Embedding model (default: text-embedding-3-small)
    /// - `OPENAI_MAX_TOKENS` - Max completion tokens (default: 1024)
    /// - `OPENAI_TEMPERATURE` - Temperature (default: 0.7)
    /// - `OPENAI_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
    pub fn from_env() -> Result<Self, CoreError> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| CoreError::Configuration("OPENAI_API_KEY not set".to_string()))?;

        let defaults = Self::default();

        let api_url = env::var("OPENAI_API_URL").unwrap_or(defaults.api_url);
        let model = env::var("OPENAI_MODEL").unwrap_or(defaults.model);
        let embedding_model =
            env::var("OPENAI_EMBEDDING_MODEL").unwrap_or(defaults.embedding_model);

        let max_tokens = env::var("OPENAI_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.max_tokens);

        let temperature = env::var("OPENAI_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.temperature);

        let request_timeout = env::var("OPENAI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        Ok(Self {
            api_url,
            api_key,
            model,
            embedding_model,
            max_tokens,
            temperature,
            request_timeout,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> OpenAiConfigBuilder {
        OpenAiConfigBuilder::default()
    }
}

/// Builder for OpenAiConfig.
#[derive(Debug, Default)]
pub struct OpenAiConfigBuilder {
    config: OpenAiConfig,
}

impl OpenAiConfigBuilder {
    /// Set the API URL.
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.config.api_url = api_url.into();
        self
    }

    /// Set the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = api_key.into();
        self
    }

    /// Set the chat model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the embedding model.
    pub fn embedding_model(mut self, embedding_model: impl Into<String>) -> Self {
        self.config.embedding_model = embedding_model.into();
        self
    }

    /// Set the request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Build the config.
    pub fn build(self) -> OpenAiConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OpenAiConfig::default();
        assert_eq!(config.api_url, "https://api.openai.com");
        assert_eq!(config.model, "o4-mini");
        assert_eq!(config.embedding_model, "text-embedding-3-small");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder() {
        let config = OpenAiConfig::builder()
            .api_key("test-key")
            .model("gpt-4o-mini")
            .request_timeout(Duration::from_secs(5))
            .build();
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
