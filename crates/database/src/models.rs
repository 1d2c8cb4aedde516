//! Database models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::BTreeMap;

/// A user profile, one per phone identifier.
///
/// Created on first contact and upserted on every turn. Identity and health
/// fields are filled in step by step during onboarding; gamification fields
/// are maintained by the streak engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    /// Phone identifier (e.g., "+918971780778"). Unique key.
    pub phone: String,
    /// Display name, collected at onboarding step 1.
    pub name: Option<String>,
    /// Date of birth as an ISO date string (YYYY-MM-DD).
    pub dob: Option<String>,
    /// Age in years, derived from the date of birth.
    pub age: Option<i64>,
    /// Sex, stored verbatim from onboarding.
    pub sex: Option<String>,
    /// Height in centimeters.
    pub height_cm: Option<i64>,
    /// Weight in kilograms.
    pub weight_kg: Option<f64>,
    /// Body mass index, rounded to one decimal.
    pub bmi: Option<f64>,
    /// Wellness goals, comma-split at onboarding step 6.
    pub goals: Json<Vec<String>>,
    /// Diet preference (e.g., "vegetarian").
    pub diet_preference: Option<String>,
    /// Allergies, free text.
    pub allergies: Option<String>,
    /// Meals per day, free text.
    pub meal_frequency: Option<String>,
    /// Current onboarding step index (0..=9).
    pub onboarding_step: i64,
    /// True once the terminal onboarding step has been passed.
    pub onboarding_complete: bool,
    /// Running points total.
    pub points: i64,
    /// Consecutive calendar days with at least one interaction.
    pub current_streak: i64,
    /// Timestamp of the most recent interaction.
    pub last_interaction: Option<DateTime<Utc>>,
    /// Versioned extension map. Always carries `schema_version`; other keys
    /// are documented where they are written.
    pub extra_info: Json<serde_json::Value>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A stored user-message/bot-response pair with derived keywords and
/// embedding. Immutable once created; append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Exchange {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning phone identifier.
    pub phone: String,
    /// The user's message text.
    pub user_message: String,
    /// The bot's reply text.
    pub bot_response: String,
    /// Keywords extracted from the user message (at most 5).
    pub user_keywords: Json<Vec<String>>,
    /// Keywords extracted from the bot response (at most 5).
    pub bot_keywords: Json<Vec<String>>,
    /// Embedding of the user message as little-endian f32 bytes; empty when
    /// the embedder was unavailable. See [`crate::embedding`].
    pub embedding: Vec<u8>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A new exchange to append. The ID and timestamp are assigned on insert.
#[derive(Debug, Clone, Default)]
pub struct NewExchange {
    pub phone: String,
    pub user_message: String,
    pub bot_response: String,
    pub user_keywords: Vec<String>,
    pub bot_keywords: Vec<String>,
    pub embedding: Vec<f32>,
}

/// Derived behaviour profile, one per phone.
///
/// A cache over [`Exchange`] history, replaced wholesale by the analytics
/// refresh batch. Must always be reconstructible from exchanges alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserBehaviour {
    /// Owning phone identifier. Unique key.
    pub phone: String,
    /// Top keywords, ranked by descending frequency.
    pub top_keywords: Json<Vec<String>>,
    /// Co-occurrence counts between top keywords.
    pub cooccurrence: Json<BTreeMap<String, BTreeMap<String, i64>>>,
    /// Total exchanges scanned for this profile.
    pub total_messages: i64,
    /// Timestamp of the most recent exchange.
    pub last_interaction: Option<DateTime<Utc>>,
    /// When the profile was last recomputed.
    pub updated_at: DateTime<Utc>,
}

/// A daily activity log, one per (phone, calendar day).
///
/// The morning and evening halves are filled in independently; logging one
/// half later updates the existing row rather than replacing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ActivityLog {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning phone identifier.
    pub phone: String,
    /// Calendar day of the log.
    pub log_date: NaiveDate,
    /// Structured morning fields (sleep hours, sleep quality, mood, goal
    /// readiness), when logged.
    pub morning_log: Option<Json<serde_json::Value>>,
    /// Structured evening fields (water, exercise, meals, diet adherence,
    /// mood, goal achievement), when logged.
    pub evening_log: Option<Json<serde_json::Value>>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}
