//! Conversation memory: the write path for exchanges and the read paths
//! that feed analytics and recall.

use std::sync::Arc;

use assistant_core::Embedder;
use database::{exchange, Database, Exchange, NewExchange};
use tracing::{debug, warn};

use crate::error::OrchestratorError;

/// Persists exchanges and exposes history reads.
///
/// The embedding for each exchange is computed from the user message at
/// write time. When the embedder is unavailable the exchange is stored
/// with an empty embedding and simply never surfaces in semantic recall.
#[derive(Clone)]
pub struct ConversationMemory {
    db: Database,
    embedder: Arc<dyn Embedder>,
}

impl ConversationMemory {
    /// Create a new conversation memory.
    pub fn new(db: Database, embedder: Arc<dyn Embedder>) -> Self {
        Self { db, embedder }
    }

    /// Append an exchange for a turn.
    pub async fn record(
        &self,
        phone: &str,
        user_message: &str,
        bot_response: &str,
        user_keywords: Vec<String>,
        bot_keywords: Vec<String>,
    ) -> Result<(), OrchestratorError> {
        let embedding = match self.embedder.embed(user_message).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!("Embedding failed, storing exchange without one: {}", e);
                Vec::new()
            }
        };

        let new_exchange = NewExchange {
            phone: phone.to_string(),
            user_message: user_message.to_string(),
            bot_response: bot_response.to_string(),
            user_keywords,
            bot_keywords,
            embedding,
        };

        let id = exchange::append(self.db.pool(), &new_exchange).await?;
        debug!("Recorded exchange {} for {}", id, phone);
        Ok(())
    }

    /// All exchanges for a phone, oldest first.
    pub async fn history(&self, phone: &str) -> Result<Vec<Exchange>, OrchestratorError> {
        Ok(exchange::find_by_phone(self.db.pool(), phone).await?)
    }

    /// The most recent `limit` exchanges for a phone, newest first.
    pub async fn recent(
        &self,
        phone: &str,
        limit: i64,
    ) -> Result<Vec<Exchange>, OrchestratorError> {
        Ok(exchange::recent(self.db.pool(), phone, limit).await?)
    }

    /// Every distinct phone with at least one exchange.
    pub async fn distinct_phones(&self) -> Result<Vec<String>, OrchestratorError> {
        Ok(exchange::distinct_phones(self.db.pool()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_core::{async_trait, CoreError};

    struct FixedEmbedder(Vec<f32>);

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, CoreError> {
            Ok(self.0.clone())
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, CoreError> {
            Err(CoreError::Network("embedder down".to_string()))
        }
    }

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_record_stores_embedding() {
        let db = test_db().await;
        let memory = ConversationMemory::new(db, Arc::new(FixedEmbedder(vec![0.5, 0.5])));

        memory
            .record("+1", "hello", "hi!", vec!["greeting".to_string()], vec![])
            .await
            .unwrap();

        let history = memory.history("+1").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(
            database::embedding::decode(&history[0].embedding).unwrap(),
            vec![0.5, 0.5]
        );
        assert_eq!(history[0].user_keywords.0, vec!["greeting"]);
    }

    #[tokio::test]
    async fn test_embedder_failure_still_records() {
        let db = test_db().await;
        let memory = ConversationMemory::new(db, Arc::new(FailingEmbedder));

        memory
            .record("+1", "hello", "hi!", vec![], vec![])
            .await
            .unwrap();

        let history = memory.history("+1").await.unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].embedding.is_empty());
    }
}
