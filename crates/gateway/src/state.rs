//! Application state shared across handlers.

use std::sync::Arc;

use database::Database;
use orchestrator::{ConversationRouter, KeywordAnalytics};

use crate::sender::WhatsappSender;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The conversation router handling each turn.
    pub router: Arc<ConversationRouter<WhatsappSender>>,
    /// Database connection.
    pub db: Database,
    /// Analytics for the on-demand refresh route.
    pub analytics: KeywordAnalytics,
    /// Concurrency bound for on-demand refreshes.
    pub refresh_concurrency: usize,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        router: Arc<ConversationRouter<WhatsappSender>>,
        db: Database,
        analytics: KeywordAnalytics,
        refresh_concurrency: usize,
    ) -> Self {
        Self {
            router,
            db,
            analytics,
            refresh_concurrency,
        }
    }
}
