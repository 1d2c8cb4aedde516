//! Webhook gateway for the Vita WhatsApp wellness assistant.
//!
//! Wires the collaborators together at process start (database, OpenAI
//! brain, Twilio sender, conversation router), spawns the periodic
//! behaviour-refresh task, and serves the webhook and admin routes.

mod config;
mod routes;
mod sender;
mod state;

use std::sync::Arc;

use assistant_core::{Embedder, Generator};
use database::Database;
use openai_brain::OpenAiBrain;
use orchestrator::{ConversationRouter, KeywordAnalytics};
use tracing::{info, warn};
use twilio_whatsapp::TwilioClient;

use crate::config::Config;
use crate::sender::WhatsappSender;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting Vita gateway");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Collaborators are constructed once here and shared read-only
    let brain = Arc::new(OpenAiBrain::from_env()?);
    let generator: Arc<dyn Generator> = brain.clone();
    let embedder: Arc<dyn Embedder> = brain;

    let twilio = TwilioClient::from_env()?;
    let sender = WhatsappSender::new(twilio);

    let router = Arc::new(ConversationRouter::new(
        db.clone(),
        generator,
        embedder,
        sender,
    ));
    let analytics = KeywordAnalytics::new(db.clone());

    spawn_behaviour_refresh(analytics.clone(), &config);

    // Build application state and routes
    let state = AppState::new(router, db, analytics, config.refresh_concurrency);
    let app = routes::router().with_state(state);

    // Start server
    info!(addr = %config.addr, "Vita gateway listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Run the behaviour refresh on a fixed interval.
fn spawn_behaviour_refresh(analytics: KeywordAnalytics, config: &Config) {
    let interval = config.refresh_interval;
    let concurrency = config.refresh_concurrency;

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so boot stays fast.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            info!("Starting scheduled behaviour refresh");
            match analytics.refresh_all(concurrency).await {
                Ok(summary) => {
                    if !summary.failures.is_empty() {
                        warn!(
                            "Behaviour refresh finished with {} failures",
                            summary.failures.len()
                        );
                    }
                }
                Err(e) => warn!("Behaviour refresh batch failed: {}", e),
            }
        }
    });
}
