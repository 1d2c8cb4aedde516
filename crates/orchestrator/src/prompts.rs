//! Prompt construction for the generation collaborator.
//!
//! Prompts carry the user-details excerpt as JSON, a tone instruction
//! keyed to age and sex, optional behavioural context, and a JSON-only
//! reply contract matching the schemas in [`crate::replies`].

use database::activity_log::LogHalf;
use database::UserProfile;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::replies::Recipe;

/// The slice of a profile shared with the generation collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct UserDetails {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub height: Option<i64>,
    pub weight: Option<f64>,
    pub bmi: Option<f64>,
    pub sex: Option<String>,
    pub goals: Vec<String>,
    pub diet_preference: Option<String>,
    pub allergies: Option<String>,
}

impl UserDetails {
    /// Extract the prompt-facing excerpt from a profile.
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            age: profile.age,
            height: profile.height_cm,
            weight: profile.weight_kg,
            bmi: profile.bmi,
            sex: profile.sex.clone(),
            goals: profile.goals.0.clone(),
            diet_preference: profile.diet_preference.clone(),
            allergies: profile.allergies.clone(),
        }
    }
}

/// Behavioural context injected into chat and recipe prompts.
#[derive(Debug, Clone, Default)]
pub struct ExtraContext {
    /// Ranked top keywords for the user.
    pub top_keywords: Vec<String>,
    /// Co-occurrence counts between top keywords.
    pub cooccurrence: BTreeMap<String, BTreeMap<String, i64>>,
    /// Semantic-recall excerpt from past exchanges.
    pub memory: Option<String>,
}

impl ExtraContext {
    /// True when there is nothing worth injecting.
    pub fn is_empty(&self) -> bool {
        self.top_keywords.is_empty() && self.cooccurrence.is_empty() && self.memory.is_none()
    }

    fn format_block(&self) -> String {
        let top = if self.top_keywords.is_empty() {
            "none".to_string()
        } else {
            self.top_keywords.join(", ")
        };
        let co = serde_json::to_string(&self.cooccurrence).unwrap_or_else(|_| "{}".to_string());
        format!(
            "Extra context:\n- Top Keywords: {}\n- Co-occurring Keywords: {}\n- Semantic Memory: {}",
            top,
            co,
            self.memory.as_deref().unwrap_or("none")
        )
    }
}

/// Tone instruction keyed to age band and sex.
pub fn tone_instruction(age: Option<i64>, sex: Option<&str>) -> &'static str {
    let sex = sex.map(|s| s.to_lowercase());

    let Some(age) = age else {
        return "Respond in a neutral, friendly, and clear tone.";
    };

    if age < 18 {
        return "Respond in a fun, simple, and encouraging tone suitable for teenagers.";
    }
    if age < 25 {
        return "Respond in a casual, relatable, and upbeat tone with easy-to-understand language.";
    }
    if age <= 40 {
        return match sex.as_deref() {
            Some("male") => "Respond in a confident, concise, and solution-focused tone.",
            Some("female") => "Respond in a warm, clear, and supportive tone.",
            _ => "Respond in a clear, friendly, and balanced tone.",
        };
    }
    if age <= 60 {
        return "Respond in a respectful, practical, and reassuring tone.";
    }
    "Respond in a patient, polite, and formal tone, showing care and respect."
}

fn user_details_json(profile: &UserProfile) -> String {
    serde_json::to_string(&UserDetails::from_profile(profile))
        .unwrap_or_else(|_| "{}".to_string())
}

fn extra_context_block(extra: Option<&ExtraContext>) -> String {
    match extra {
        Some(extra) if !extra.is_empty() => extra.format_block(),
        _ => String::new(),
    }
}

/// Prompt for free-form wellness chat.
pub fn chat_prompt(
    profile: &UserProfile,
    user_message: &str,
    extra: Option<&ExtraContext>,
) -> String {
    format!(
        r#"You are a helpful AI assistant. {tone}

User details (JSON):
{details}

{extra}

User request: "{message}"

Instructions:
- Keep answers short, friendly, and encouraging, with gentle health tips.
- Only respond if the request is health/wellness related, else return null.
- Always output up to 5 input/output keywords (exclude generic/filler words).

Return ONLY valid JSON:
{{
  "response": string | null,
  "input_keywords": [string],
  "output_keywords": [string]
}}"#,
        tone = tone_instruction(profile.age, profile.sex.as_deref()),
        details = user_details_json(profile),
        extra = extra_context_block(extra),
        message = user_message,
    )
}

/// Prompt for the recipe intent.
pub fn recipe_prompt(
    profile: &UserProfile,
    user_message: &str,
    extra: Option<&ExtraContext>,
) -> String {
    format!(
        r#"You are a helpful AI assistant. {tone}

User details (JSON):
{details}

{extra}

User request: "{message}"

Instructions:
- Suggest a healthy recipe tailored to the user's goals, diet, and allergies.
- Keep ingredients simple and steps clear.
- Identify up to 5 meaningful input/output keywords (exclude generic/filler words).

Return ONLY valid JSON:
{{
  "recipe": {{
    "name": string,
    "ingredients": [string],
    "steps": [string],
    "nutrition": {{
      "calories": number,
      "protein": string,
      "carbs": string,
      "fat": string
    }}
  }},
  "input_keywords": [string],
  "output_keywords": [string]
}}"#,
        tone = tone_instruction(profile.age, profile.sex.as_deref()),
        details = user_details_json(profile),
        extra = extra_context_block(extra),
        message = user_message,
    )
}

/// Prompt that extracts a structured daily log and generates a tip.
pub fn daily_log_prompt(
    half: LogHalf,
    profile: &UserProfile,
    question: &str,
    answer: &str,
) -> String {
    let (tip_type, log_shape) = match half {
        LogHalf::Morning => (
            "MORNING",
            "{ sleep_hours, sleep_quality, mood, goal_readiness }",
        ),
        LogHalf::Evening => (
            "EVENING",
            "{ water_glasses, exercised, exercise_type, duration_minutes, meals, diet_followed, mood, goal_achieved }",
        ),
    };

    format!(
        r#"You are a helpful AI health assistant. {tone}

User details (JSON):
{details}

Tip Type: {tip_type}

Question: "{question}"
Answer: "{answer}"

Tasks:
1. Extract a structured log matching {log_shape} with correct types
   (numbers, booleans, categorical values).
2. Generate a short, actionable, and encouraging health tip:
   - Morning: focus on energy/nutrition/activity
   - Evening: focus on reflection/relaxation/tomorrow prep
   - Respect diet & allergies
   - Keep within 1-2 sentences

Return ONLY valid JSON:
{{
  "log": {{ ... }},
  "tip": {{
    "message": string,
    "reason": string
  }}
}}"#,
        tone = tone_instruction(profile.age, profile.sex.as_deref()),
        details = user_details_json(profile),
    )
}

/// One-shot health tip prompt for the `tip` quick intent.
pub fn health_tip_prompt() -> &'static str {
    "Give one short health tip for general wellness in under 30 words."
}

/// The structured question for a daily-log half.
pub fn log_question(half: LogHalf) -> &'static str {
    match half {
        LogHalf::Morning => {
            "Please reply in this format:\n\n\
             1. How many hours did you sleep?\n\
             2. How was your sleep? (great / okay / poor)\n\
             3. How do you feel now? (energetic / tired / happy / stressed / relaxed)\n\
             4. How ready do you feel for your goals today? (1-5)\n\n\
             Example reply:\n\
             7 hours, okay, tired, 4"
        }
        LogHalf::Evening => {
            "Please reply in this format:\n\n\
             1. How many glasses of water did you drink?\n\
             2. Did you exercise? (yes / no)\n\
             3. If yes, what type and how long? (cardio / strength / yoga / stretching / other, minutes)\n\
             4. How many meals did you have?\n\
             5. Did you follow your diet? (yes / no)\n\
             6. How do you feel now? (happy / tired / stressed / relaxed)\n\
             7. Did you achieve your main goal today? (yes / no)\n\n\
             Example reply:\n\
             6 glasses, yes, strength 45, 3 meals, yes, happy, yes"
        }
    }
}

/// Render a recipe for WhatsApp.
pub fn format_recipe(recipe: &Recipe) -> String {
    let mut msg = format!("🍲 {}\n\nIngredients:\n", recipe.name);
    for item in &recipe.ingredients {
        msg.push_str(&format!("- {}\n", item));
    }
    msg.push_str("\nSteps:\n");
    for (i, step) in recipe.steps.iter().enumerate() {
        msg.push_str(&format!("{}. {}\n", i + 1, step));
    }

    if let Some(nutrition) = &recipe.nutrition {
        msg.push_str("\nNutritional Info (per serving):\n");
        for (key, value) in nutrition {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            msg.push_str(&format!("- {}: {}\n", key, value));
        }
    }

    msg.trim().to_string()
}
