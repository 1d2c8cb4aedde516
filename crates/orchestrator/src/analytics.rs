//! Keyword analytics over exchange history.
//!
//! Frequency and co-occurrence statistics are recomputed from scratch on
//! every invocation by rescanning a user's exchanges. That favors
//! correctness and simplicity over recomputation cost; the refresh runs as
//! a periodic batch over a bounded user population, never on the message
//! hot path.

use std::collections::{BTreeMap, HashMap};

use database::{behaviour, exchange, Database};
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::error::OrchestratorError;

/// Default size of the top-keyword set.
pub const DEFAULT_TOP_KEYWORDS: usize = 20;

/// Outcome of a behaviour refresh batch.
#[derive(Debug, Default)]
pub struct RefreshSummary {
    /// Phones whose behaviour profile was replaced.
    pub refreshed: usize,
    /// Per-phone failures, isolated from the rest of the batch.
    pub failures: Vec<(String, String)>,
}

/// Keyword frequency and co-occurrence statistics per user.
#[derive(Clone)]
pub struct KeywordAnalytics {
    db: Database,
}

impl KeywordAnalytics {
    /// Create a new analytics reader over the given database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Top `n` user-side keywords for a phone, ranked by descending count.
    ///
    /// Ties are broken by lexicographic keyword order, so the ranking is
    /// stable no matter what order exchanges are scanned in.
    pub async fn top_keywords(
        &self,
        phone: &str,
        n: usize,
    ) -> Result<Vec<(String, i64)>, OrchestratorError> {
        let keyword_sets = exchange::user_keywords_by_phone(self.db.pool(), phone).await?;

        let mut counts: HashMap<String, i64> = HashMap::new();
        for set in &keyword_sets {
            for keyword in set {
                *counts.entry(keyword.clone()).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(String, i64)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(n);
        Ok(ranked)
    }

    /// Co-occurrence counts between a phone's top `n` keywords.
    ///
    /// For each exchange, every unordered pair of distinct keywords from
    /// that exchange's keyword set that are both in the top-`n` set
    /// increments a counter; a keyword never co-occurs with itself. The
    /// map stores both directions of each pair.
    pub async fn cooccurrence(
        &self,
        phone: &str,
        n: usize,
    ) -> Result<BTreeMap<String, BTreeMap<String, i64>>, OrchestratorError> {
        let top: Vec<String> = self
            .top_keywords(phone, n)
            .await?
            .into_iter()
            .map(|(keyword, _)| keyword)
            .collect();

        let keyword_sets = exchange::user_keywords_by_phone(self.db.pool(), phone).await?;
        let mut map: BTreeMap<String, BTreeMap<String, i64>> = BTreeMap::new();

        for set in &keyword_sets {
            // Treat each exchange's keywords as a set: distinct, top-N only.
            let mut in_top: Vec<&String> = set
                .iter()
                .filter(|keyword| top.contains(keyword))
                .collect();
            in_top.sort();
            in_top.dedup();

            for i in 0..in_top.len() {
                for j in (i + 1)..in_top.len() {
                    let (a, b) = (in_top[i], in_top[j]);
                    *map.entry(a.clone()).or_default().entry(b.clone()).or_insert(0) += 1;
                    *map.entry(b.clone()).or_default().entry(a.clone()).or_insert(0) += 1;
                }
            }
        }

        Ok(map)
    }

    /// Recompute and replace the behaviour profile for one phone.
    pub async fn refresh_user(&self, phone: &str) -> Result<(), OrchestratorError> {
        // Top keywords must be computed before co-occurrence, which is
        // restricted to the top set.
        let top = self.top_keywords(phone, DEFAULT_TOP_KEYWORDS).await?;
        let cooccurrence = self.cooccurrence(phone, DEFAULT_TOP_KEYWORDS).await?;

        let top_keywords: Vec<String> = top.into_iter().map(|(keyword, _)| keyword).collect();
        let total_messages = exchange::count_by_phone(self.db.pool(), phone).await?;
        let last_interaction = exchange::recent(self.db.pool(), phone, 1)
            .await?
            .first()
            .map(|e| e.created_at);

        behaviour::replace(
            self.db.pool(),
            phone,
            &top_keywords,
            &cooccurrence,
            total_messages,
            last_interaction,
        )
        .await?;

        Ok(())
    }

    /// Refresh every user with history, processing up to `concurrency`
    /// users at a time.
    ///
    /// One user's failure never aborts the batch; failures are collected
    /// in the summary.
    pub async fn refresh_all(&self, concurrency: usize) -> Result<RefreshSummary, OrchestratorError> {
        let phones = exchange::distinct_phones(self.db.pool()).await?;
        let total = phones.len();

        let results = stream::iter(phones)
            .map(|phone| async move {
                let result = self.refresh_user(&phone).await;
                (phone, result)
            })
            .buffer_unordered(concurrency.max(1))
            .collect::<Vec<_>>()
            .await;

        let mut summary = RefreshSummary::default();
        for (phone, result) in results {
            match result {
                Ok(()) => summary.refreshed += 1,
                Err(e) => {
                    warn!("Behaviour refresh failed for {}: {}", phone, e);
                    summary.failures.push((phone, e.to_string()));
                }
            }
        }

        info!(
            "Behaviour refresh done: {}/{} users, {} failures",
            summary.refreshed,
            total,
            summary.failures.len()
        );
        Ok(summary)
    }
}
