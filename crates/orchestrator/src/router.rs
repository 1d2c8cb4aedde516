//! The top-level conversation router.
//!
//! One call to [`ConversationRouter::handle`] processes one inbound
//! message end to end: profile load, quick commands, onboarding, streak,
//! intent dispatch, context gathering, generation, persistence, and
//! delivery. Every failure path degrades to a plain-language reply; no
//! error ever propagates to the transport layer.

use std::sync::Arc;

use assistant_core::{Embedder, Generator, InboundMessage, OutboundMessage};
use database::activity_log::LogHalf;
use database::{activity_log, behaviour, user, Database, UserProfile};
use serde::de::DeserializeOwned;
use tracing::{error, info, warn};

use crate::error::OrchestratorError;
use crate::intent::{self, Intent, QuickCommand};
use crate::memory::ConversationMemory;
use crate::onboarding::{self, StepOutcome};
use crate::prompts::{self, ExtraContext};
use crate::recall::{self, SemanticRecall};
use crate::replies::{clamp_keywords, ChatReply, DailyLogReply, RecipeReply};
use crate::sender::MessageSender;
use crate::streak;

/// Reply for a bare greeting from an onboarded user.
pub const GREETING_REPLY: &str = "👋 Welcome back! Ask me anything about your wellness, \
say 'recipe' for meal ideas, or 'log' to track your day.";

/// Help text shown when the user asks for help.
pub const HELP_TEXT: &str = "I'm Vita, your wellness assistant 🌿

Here's what I can do:
• Ask me anything about sleep, food, exercise, or stress
• \"recipe\" - get a meal idea tailored to your goals and allergies
• \"tip\" - a quick health tip
• \"log morning\" / \"log evening\" - track your day
• \"profile\" - see your stored details

Every day you check in grows your streak and earns points!";

/// Reply when generation is unavailable or unusable.
pub const FALLBACK_REPLY: &str =
    "😅 I'm having trouble thinking right now. Please try again in a bit.";

/// Reply when the turn cannot proceed at all (profile store down).
pub const APOLOGY_REPLY: &str =
    "😔 Something went wrong on my end. Please try again later.";

/// Reply when the model declines a non-wellness request.
pub const OFF_TOPIC_REPLY: &str = "🙏 I can help with health and wellness questions. \
Ask me about sleep, food, exercise, or how you're feeling!";

/// Tunable knobs for context gathering.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// How many past exchanges semantic recall returns.
    pub recall_top_k: usize,
    /// Candidate pool breadth for recall.
    pub recall_pool_size: i64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            recall_top_k: crate::recall::DEFAULT_TOP_K,
            recall_pool_size: crate::recall::DEFAULT_POOL_SIZE,
        }
    }
}

/// The per-message dispatcher.
pub struct ConversationRouter<S: MessageSender> {
    db: Database,
    generator: Arc<dyn Generator>,
    memory: ConversationMemory,
    recall: SemanticRecall,
    sender: S,
    config: RouterConfig,
}

impl<S: MessageSender> ConversationRouter<S> {
    /// Create a router with default configuration.
    pub fn new(
        db: Database,
        generator: Arc<dyn Generator>,
        embedder: Arc<dyn Embedder>,
        sender: S,
    ) -> Self {
        Self::with_config(db, generator, embedder, sender, RouterConfig::default())
    }

    /// Create a router with explicit configuration.
    pub fn with_config(
        db: Database,
        generator: Arc<dyn Generator>,
        embedder: Arc<dyn Embedder>,
        sender: S,
        config: RouterConfig,
    ) -> Self {
        let memory = ConversationMemory::new(db.clone(), embedder.clone());
        let recall = SemanticRecall::new(db.clone(), embedder);
        Self {
            db,
            generator,
            memory,
            recall,
            sender,
            config,
        }
    }

    /// Process one inbound message end to end.
    ///
    /// Always resolves to the reply that was produced; delivery failures
    /// are logged and do not fail the turn.
    pub async fn handle(
        &self,
        message: InboundMessage,
    ) -> Result<OutboundMessage, OrchestratorError> {
        info!("Processing message from {}", message.phone);

        // Without profile state nothing can proceed safely.
        let mut profile = match user::get_or_create(self.db.pool(), &message.phone).await {
            Ok(profile) => profile,
            Err(e) => {
                error!("Failed to load profile for {}: {}", message.phone, e);
                return self.deliver(&message, APOLOGY_REPLY.to_string()).await;
            }
        };

        // Quick commands short-circuit for onboarded users: no streak, no
        // analytics, no persistence.
        if profile.onboarding_complete {
            if let Some(command) = intent::quick_command(&message.text) {
                let reply = match command {
                    QuickCommand::Greeting => GREETING_REPLY.to_string(),
                    QuickCommand::Help => HELP_TEXT.to_string(),
                    QuickCommand::Profile => format_profile(&profile),
                };
                return self.deliver(&message, reply).await;
            }
        }

        // Onboarding consumes the whole turn.
        if !profile.onboarding_complete {
            let today = message.received_at.date_naive();
            let outcome = onboarding::advance(&mut profile, &message.text, today);
            if matches!(outcome, StepOutcome::Advanced { .. }) {
                if let Err(e) = user::upsert(self.db.pool(), &profile).await {
                    error!("Failed to save onboarding progress for {}: {}", message.phone, e);
                    return self.deliver(&message, APOLOGY_REPLY.to_string()).await;
                }
            }
            return self.deliver(&message, outcome.reply().to_string()).await;
        }

        // Streak runs before intent dispatch; the update and its write are
        // one logical step for this message.
        let annotation = streak::update(&mut profile, message.received_at);
        if let Err(e) = user::upsert(self.db.pool(), &profile).await {
            error!("Failed to save streak update for {}: {}", message.phone, e);
            return self.deliver(&message, APOLOGY_REPLY.to_string()).await;
        }

        let mut reply = match intent::classify(&message.text) {
            Intent::Recipe => self.handle_recipe(&profile, &message).await,
            Intent::Tip => self.handle_tip(&message).await,
            Intent::Log(half) => self.handle_log(&profile, &message, half).await,
            Intent::Chat => self.handle_chat(&profile, &message).await,
        };

        if let Some(annotation) = annotation {
            reply = format!("{}\n\n{}", reply, annotation);
        }

        self.deliver(&message, reply).await
    }

    async fn handle_recipe(&self, profile: &UserProfile, message: &InboundMessage) -> String {
        let extra = self.gather_context(message).await;
        let prompt = prompts::recipe_prompt(profile, &message.text, extra.as_ref());

        let Some(reply) = self.generate::<RecipeReply>(&prompt).await else {
            return FALLBACK_REPLY.to_string();
        };

        let text = prompts::format_recipe(&reply.recipe);
        self.remember(
            message,
            &text,
            clamp_keywords(reply.input_keywords),
            clamp_keywords(reply.output_keywords),
        )
        .await;
        text
    }

    async fn handle_tip(&self, message: &InboundMessage) -> String {
        match self.generator.generate(prompts::health_tip_prompt()).await {
            Ok(tip) => {
                let text = format!("💡 Health Tip:\n{}", tip.trim());
                self.remember(message, &text, Vec::new(), Vec::new()).await;
                text
            }
            Err(e) => {
                warn!("Health tip generation failed: {}", e);
                FALLBACK_REPLY.to_string()
            }
        }
    }

    async fn handle_log(
        &self,
        profile: &UserProfile,
        message: &InboundMessage,
        half: LogHalf,
    ) -> String {
        // A bare trigger gets the question template; the answers come in
        // the next message.
        if intent::is_bare_log_trigger(&message.text) {
            return prompts::log_question(half).to_string();
        }

        let question = prompts::log_question(half);
        let prompt = prompts::daily_log_prompt(half, profile, question, &message.text);

        let Some(reply) = self.generate::<DailyLogReply>(&prompt).await else {
            return FALLBACK_REPLY.to_string();
        };

        let date = message.received_at.date_naive();
        if let Err(e) =
            activity_log::upsert_log(self.db.pool(), &message.phone, date, half, &reply.log).await
        {
            warn!("Failed to store activity log for {}: {}", message.phone, e);
        }

        let text = format!("✅ Logged! {}", reply.tip.message);
        self.remember(message, &text, Vec::new(), Vec::new()).await;
        text
    }

    async fn handle_chat(&self, profile: &UserProfile, message: &InboundMessage) -> String {
        let extra = self.gather_context(message).await;
        let prompt = prompts::chat_prompt(profile, &message.text, extra.as_ref());

        let Some(reply) = self.generate::<ChatReply>(&prompt).await else {
            return FALLBACK_REPLY.to_string();
        };

        let text = match reply.response {
            Some(text) if !text.trim().is_empty() => text,
            _ => OFF_TOPIC_REPLY.to_string(),
        };

        self.remember(
            message,
            &text,
            clamp_keywords(reply.input_keywords),
            clamp_keywords(reply.output_keywords),
        )
        .await;
        text
    }

    /// Gather behavioural context for prompt construction.
    ///
    /// The behaviour-cache read and semantic recall are independent and
    /// run concurrently.
    async fn gather_context(&self, message: &InboundMessage) -> Option<ExtraContext> {
        let (behaviour_row, recalled) = tokio::join!(
            behaviour::get(self.db.pool(), &message.phone),
            self.recall.recall(
                &message.phone,
                &message.text,
                self.config.recall_top_k,
                self.config.recall_pool_size,
            )
        );

        let mut extra = ExtraContext::default();
        match behaviour_row {
            Ok(Some(row)) => {
                extra.top_keywords = row.top_keywords.0;
                extra.cooccurrence = row.cooccurrence.0;
            }
            Ok(None) => {}
            Err(e) => warn!("Behaviour lookup failed for {}: {}", message.phone, e),
        }
        match recalled {
            Ok(items) => extra.memory = recall::format_excerpt(&items),
            Err(e) => warn!("Semantic recall failed for {}: {}", message.phone, e),
        }

        if extra.is_empty() {
            None
        } else {
            Some(extra)
        }
    }

    /// Call the generator and leniently parse a structured reply.
    async fn generate<T: DeserializeOwned>(&self, prompt: &str) -> Option<T> {
        match self.generator.generate(prompt).await {
            Ok(raw) => {
                let parsed = crate::replies::parse_reply(&raw);
                if parsed.is_none() {
                    warn!("Generation output was unparseable: {}", raw);
                }
                parsed
            }
            Err(e) => {
                warn!("Generation failed: {}", e);
                None
            }
        }
    }

    /// Persist the exchange; failures are logged and never block the reply.
    async fn remember(
        &self,
        message: &InboundMessage,
        bot_response: &str,
        user_keywords: Vec<String>,
        bot_keywords: Vec<String>,
    ) {
        if let Err(e) = self
            .memory
            .record(
                &message.phone,
                &message.text,
                bot_response,
                user_keywords,
                bot_keywords,
            )
            .await
        {
            warn!("Failed to persist exchange for {}: {}", message.phone, e);
        }
    }

    async fn deliver(
        &self,
        message: &InboundMessage,
        text: String,
    ) -> Result<OutboundMessage, OrchestratorError> {
        let outbound = OutboundMessage::reply_to(message, text);
        if let Err(e) = self.sender.send(&outbound.recipient, &outbound.text).await {
            warn!("Delivery to {} failed: {}", outbound.recipient, e);
        }
        Ok(outbound)
    }
}

/// Render a profile for the `profile` quick command.
pub fn format_profile(profile: &UserProfile) -> String {
    let unset = "(not set)".to_string();
    let mut lines = vec!["Your profile:".to_string(), String::new()];
    lines.push(format!(
        "• Name: {}",
        profile.name.clone().unwrap_or_else(|| unset.clone())
    ));
    lines.push(format!(
        "• Age: {}",
        profile.age.map(|a| a.to_string()).unwrap_or_else(|| unset.clone())
    ));
    lines.push(format!(
        "• Height: {}",
        profile
            .height_cm
            .map(|h| format!("{} cm", h))
            .unwrap_or_else(|| unset.clone())
    ));
    lines.push(format!(
        "• Weight: {}",
        profile
            .weight_kg
            .map(|w| format!("{} kg", w))
            .unwrap_or_else(|| unset.clone())
    ));
    lines.push(format!(
        "• BMI: {}",
        profile.bmi.map(|b| b.to_string()).unwrap_or_else(|| unset.clone())
    ));
    lines.push(format!(
        "• Goals: {}",
        if profile.goals.0.is_empty() {
            unset.clone()
        } else {
            profile.goals.0.join(", ")
        }
    ));
    lines.push(format!(
        "• Diet: {}",
        profile.diet_preference.clone().unwrap_or_else(|| unset.clone())
    ));
    lines.push(format!(
        "• Allergies: {}",
        profile.allergies.clone().unwrap_or_else(|| unset.clone())
    ));
    lines.push(format!(
        "• Meals per day: {}",
        profile.meal_frequency.clone().unwrap_or(unset)
    ));
    lines.push(String::new());
    lines.push(format!(
        "⭐ {} points · 🔥 {}-day streak",
        profile.points, profile.current_streak
    ));
    lines.join("\n")
}
