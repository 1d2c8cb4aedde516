//! The text generation collaborator contract.

use async_trait::async_trait;

use crate::error::CoreError;

/// A language-model collaborator that turns a prompt into raw reply text.
///
/// The reply is whatever the model produced; callers that expect structured
/// output parse it themselves and must tolerate unparseable or empty
/// responses. Implementations are expected to bound each call with a
/// timeout and surface it as [`CoreError::Network`].
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String, CoreError>;
}
