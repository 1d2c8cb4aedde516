//! OpenAiBrain implementation using the OpenAI API.

use assistant_core::{async_trait, CoreError, Embedder, Generator};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{
    ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, EmbeddingRequest,
    EmbeddingResponse,
};
use crate::config::OpenAiConfig;

/// Generation and embedding collaborator backed by the OpenAI API.
///
/// The brain is stateless: every prompt carries its own context, so there
/// is no per-sender history here. Each request is bounded by the
/// configured timeout; a timeout surfaces as a network error and callers
/// fall back.
pub struct OpenAiBrain {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiBrain {
    /// Create a new OpenAiBrain with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self, CoreError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                CoreError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        info!(
            "OpenAiBrain initialized with model: {}, embedding model: {}",
            config.model, config.embedding_model
        );

        Ok(Self { client, config })
    }

    /// Create an OpenAiBrain from environment variables.
    ///
    /// See [`OpenAiConfig::from_env`] for the environment variables.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::new(OpenAiConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Make a chat completion request.
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatCompletionResponse, CoreError> {
        let url = format!("{}/v1/chat/completions", self.config.api_url);

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(CoreError::ProcessingFailed(format!(
                    "API error ({}): {}",
                    status.as_u16(),
                    api_error.error.message
                )));
            }

            return Err(CoreError::ProcessingFailed(format!(
                "API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CoreError::ProcessingFailed(format!("Failed to parse response: {}", e)))?;

        if let Some(ref usage) = completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        Ok(completion)
    }
}

#[async_trait]
impl Generator for OpenAiBrain {
    async fn generate(&self, prompt: &str) -> Result<String, CoreError> {
        let completion = self
            .chat_completion(vec![ChatMessage::user(prompt)])
            .await?;

        let text = completion
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(|s| s.trim().to_string())
            .ok_or_else(|| {
                CoreError::ProcessingFailed("completion had no content".to_string())
            })?;

        Ok(text)
    }
}

#[async_trait]
impl Embedder for OpenAiBrain {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, CoreError> {
        let url = format!("{}/v1/embeddings", self.config.api_url);

        let request = EmbeddingRequest {
            model: self.config.embedding_model.clone(),
            input: text.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CoreError::ProcessingFailed(format!(
                "API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| CoreError::ProcessingFailed(format!("Failed to parse response: {}", e)))?;

        // An answer with no vectors means embeddings are unavailable, which
        // callers handle by skipping semantic features for the turn.
        let embedding = match parsed.data.into_iter().next() {
            Some(data) => data.embedding,
            None => {
                warn!("Embedding response contained no data");
                Vec::new()
            }
        };

        Ok(embedding)
    }
}
