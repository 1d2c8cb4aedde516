//! Semantic recall over past exchanges.
//!
//! Retrieval is brute-force cosine similarity over the most recent
//! `pool_size` exchanges for the phone. With SQLite there is no vector
//! index; the pool size plays the role of an approximate-nearest-neighbor
//! search breadth and bounds the scan.

use std::sync::Arc;

use assistant_core::Embedder;
use chrono::{DateTime, Utc};
use database::{embedding, exchange, Database};
use tracing::warn;

use crate::error::OrchestratorError;

/// Default number of exchanges to recall.
pub const DEFAULT_TOP_K: usize = 3;

/// Default candidate pool breadth.
pub const DEFAULT_POOL_SIZE: i64 = 50;

/// A past exchange surfaced by semantic recall.
#[derive(Debug, Clone, PartialEq)]
pub struct RecalledExchange {
    pub user_message: String,
    pub bot_response: String,
    pub created_at: DateTime<Utc>,
    pub score: f64,
}

/// Nearest-neighbor retrieval of past exchanges by embedding similarity.
#[derive(Clone)]
pub struct SemanticRecall {
    db: Database,
    embedder: Arc<dyn Embedder>,
}

impl SemanticRecall {
    /// Create a new recall reader.
    pub fn new(db: Database, embedder: Arc<dyn Embedder>) -> Self {
        Self { db, embedder }
    }

    /// The `top_k` most similar past exchanges for `phone`, scored against
    /// an embedding of `query_text`, scanning at most `pool_size` recent
    /// candidates.
    ///
    /// Embedder failure or an empty query embedding yields an empty result
    /// rather than an error; exchanges stored without an embedding are
    /// skipped.
    pub async fn recall(
        &self,
        phone: &str,
        query_text: &str,
        top_k: usize,
        pool_size: i64,
    ) -> Result<Vec<RecalledExchange>, OrchestratorError> {
        let query = match self.embedder.embed(query_text).await {
            Ok(vector) if !vector.is_empty() => vector,
            Ok(_) => return Ok(Vec::new()),
            Err(e) => {
                warn!("Query embedding failed, skipping recall: {}", e);
                return Ok(Vec::new());
            }
        };

        let candidates = exchange::recent(self.db.pool(), phone, pool_size).await?;

        let mut scored: Vec<RecalledExchange> = candidates
            .into_iter()
            .filter_map(|candidate| {
                let stored = embedding::decode(&candidate.embedding)?;
                if stored.is_empty() {
                    return None;
                }
                Some(RecalledExchange {
                    score: cosine_similarity(&query, &stored),
                    user_message: candidate.user_message,
                    bot_response: candidate.bot_response,
                    created_at: candidate.created_at,
                })
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);
        Ok(scored)
    }
}

/// Cosine similarity between two vectors; 0.0 for mismatched lengths or
/// zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    let mag_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}

/// Format recalled exchanges into a prompt excerpt.
pub fn format_excerpt(recalled: &[RecalledExchange]) -> Option<String> {
    if recalled.is_empty() {
        return None;
    }

    let lines: Vec<String> = recalled
        .iter()
        .map(|r| format!("User asked: {} | You answered: {}", r.user_message, r.bot_response))
        .collect();
    Some(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assistant_core::{async_trait, CoreError};
    use database::NewExchange;

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
            Err(CoreError::Network("down".to_string()))
        }
    }

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    async fn add_exchange(db: &Database, phone: &str, message: &str, embedding: Vec<f32>) {
        let new_exchange = NewExchange {
            phone: phone.to_string(),
            user_message: message.to_string(),
            bot_response: format!("re: {message}"),
            user_keywords: vec![],
            bot_keywords: vec![],
            embedding,
        };
        exchange::append(db.pool(), &new_exchange).await.unwrap();
    }

    #[test]
    fn test_cosine_similarity_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-9);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-9);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-9);
        // Length mismatch and zero vectors degrade to 0
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_recall_ranks_by_similarity() {
        let db = test_db().await;
        add_exchange(&db, "+1", "about sleep", vec![1.0, 0.0]).await;
        add_exchange(&db, "+1", "about diet", vec![0.0, 1.0]).await;
        add_exchange(&db, "+1", "mixed", vec![0.7, 0.7]).await;

        let recall = SemanticRecall::new(db, Arc::new(FixedEmbedder(vec![1.0, 0.0])));
        let results = recall.recall("+1", "sleep?", 2, 50).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].user_message, "about sleep");
        assert_eq!(results[1].user_message, "mixed");
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn test_recall_restricted_to_phone() {
        let db = test_db().await;
        add_exchange(&db, "+1", "mine", vec![1.0, 0.0]).await;
        add_exchange(&db, "+2", "theirs", vec![1.0, 0.0]).await;

        let recall = SemanticRecall::new(db, Arc::new(FixedEmbedder(vec![1.0, 0.0])));
        let results = recall.recall("+1", "q", 10, 50).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].user_message, "mine");
    }

    #[tokio::test]
    async fn test_recall_skips_missing_embeddings() {
        let db = test_db().await;
        add_exchange(&db, "+1", "no embedding", vec![]).await;
        add_exchange(&db, "+1", "embedded", vec![1.0, 0.0]).await;

        let recall = SemanticRecall::new(db, Arc::new(FixedEmbedder(vec![1.0, 0.0])));
        let results = recall.recall("+1", "q", 10, 50).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].user_message, "embedded");
    }

    #[tokio::test]
    async fn test_embedder_failure_returns_empty() {
        let db = test_db().await;
        add_exchange(&db, "+1", "embedded", vec![1.0, 0.0]).await;

        let recall = SemanticRecall::new(db, Arc::new(FailingEmbedder));
        let results = recall.recall("+1", "q", 10, 50).await.unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_format_excerpt() {
        assert!(format_excerpt(&[]).is_none());

        let recalled = vec![RecalledExchange {
            user_message: "how to sleep".to_string(),
            bot_response: "wind down early".to_string(),
            created_at: Utc::now(),
            score: 0.9,
        }];
        let excerpt = format_excerpt(&recalled).unwrap();
        assert!(excerpt.contains("how to sleep"));
        assert!(excerpt.contains("wind down early"));
    }
}
