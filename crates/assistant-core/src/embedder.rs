//! The embedding collaborator contract.

use async_trait::async_trait;

use crate::error::CoreError;

/// A collaborator that maps text to an embedding vector.
///
/// An empty vector signals "embeddings unavailable" rather than an error;
/// callers degrade by skipping semantic features for that turn.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Compute an embedding for the given text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, CoreError>;
}
