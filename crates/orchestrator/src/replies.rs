//! Structured reply types and lenient parsing of LLM output.
//!
//! The generation collaborator is asked for JSON-only replies, but models
//! wrap JSON in markdown fences, prepend prose, or append stray braces.
//! Parsing extracts a balanced JSON object from wherever it sits in the
//! text and deserializes leniently; any failure yields `None` and the
//! caller falls back to a canned reply.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Upper bound on keywords stored per side of an exchange.
pub const MAX_KEYWORDS: usize = 5;

/// Reply schema for free-form wellness chat.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    /// The reply text, or null when the request was not wellness-related.
    pub response: Option<String>,
    #[serde(default)]
    pub input_keywords: Vec<String>,
    #[serde(default)]
    pub output_keywords: Vec<String>,
}

/// A generated recipe.
#[derive(Debug, Clone, Deserialize)]
pub struct Recipe {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    /// Per-serving nutrition facts, e.g. calories/protein/carbs/fat.
    #[serde(default)]
    pub nutrition: Option<BTreeMap<String, serde_json::Value>>,
}

/// Reply schema for the recipe intent.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeReply {
    pub recipe: Recipe,
    #[serde(default)]
    pub input_keywords: Vec<String>,
    #[serde(default)]
    pub output_keywords: Vec<String>,
}

/// A short generated tip.
#[derive(Debug, Clone, Deserialize)]
pub struct Tip {
    pub message: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Reply schema for the daily-log intent: the extracted structured log
/// plus an encouraging tip.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyLogReply {
    pub log: serde_json::Value,
    pub tip: Tip,
}

/// Parse a structured reply out of raw LLM text.
///
/// Returns `None` when no parseable JSON object of the expected shape is
/// present.
pub fn parse_reply<T: DeserializeOwned>(raw: &str) -> Option<T> {
    let json = extract_json(raw);
    serde_json::from_str(json).ok()
}

/// Trim keywords, drop empties, and clamp to [`MAX_KEYWORDS`].
pub fn clamp_keywords(keywords: Vec<String>) -> Vec<String> {
    keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .take(MAX_KEYWORDS)
        .collect()
}

/// Locate the JSON object inside a response that may carry markdown fences
/// or surrounding prose.
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    if trimmed.starts_with('{') {
        return extract_balanced(trimmed);
    }

    // JSON fenced as ```json ... ```
    if let Some(start) = trimmed.find("```json") {
        let body = &trimmed[start + 7..];
        if let Some(end) = body.find("```") {
            return extract_balanced(body[..end].trim());
        }
    }

    // Generic code fence
    if let Some(start) = trimmed.find("```") {
        let body = &trimmed[start + 3..];
        let body_start = body.find('\n').map(|i| i + 1).unwrap_or(0);
        if let Some(end) = body[body_start..].find("```") {
            return extract_balanced(body[body_start..body_start + end].trim());
        }
    }

    // First object anywhere in the text
    if let Some(start) = trimmed.find('{') {
        return extract_balanced(&trimmed[start..]);
    }

    trimmed
}

/// Extract a balanced JSON object from a string starting with '{',
/// tolerating trailing characters such as extra closing braces.
fn extract_balanced(s: &str) -> &str {
    if !s.starts_with('{') {
        return s;
    }

    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in s.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return &s[..=i];
                }
            }
            _ => {}
        }
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clean_chat_reply() {
        let raw = r#"{"response": "Drink more water!", "input_keywords": ["water"], "output_keywords": ["hydration"]}"#;
        let reply: ChatReply = parse_reply(raw).unwrap();
        assert_eq!(reply.response.as_deref(), Some("Drink more water!"));
        assert_eq!(reply.input_keywords, vec!["water"]);
    }

    #[test]
    fn test_parse_null_response() {
        let raw = r#"{"response": null, "input_keywords": [], "output_keywords": []}"#;
        let reply: ChatReply = parse_reply(raw).unwrap();
        assert!(reply.response.is_none());
    }

    #[test]
    fn test_parse_fenced_reply() {
        let raw = "Here you go:\n```json\n{\"response\": \"ok\"}\n```";
        let reply: ChatReply = parse_reply(raw).unwrap();
        assert_eq!(reply.response.as_deref(), Some("ok"));
    }

    #[test]
    fn test_parse_trailing_braces() {
        let raw = r#"{"response": "ok"}}}"#;
        let reply: ChatReply = parse_reply(raw).unwrap();
        assert_eq!(reply.response.as_deref(), Some("ok"));
    }

    #[test]
    fn test_braces_inside_strings_ignored() {
        let raw = r#"{"response": "use {curly} braces"} trailing"#;
        let reply: ChatReply = parse_reply(raw).unwrap();
        assert_eq!(reply.response.as_deref(), Some("use {curly} braces"));
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(parse_reply::<ChatReply>("I cannot answer that.").is_none());
        assert!(parse_reply::<ChatReply>("").is_none());
        assert!(parse_reply::<ChatReply>(r#"{"respo"#).is_none());
    }

    #[test]
    fn test_parse_recipe_reply() {
        let raw = r#"{
            "recipe": {
                "name": "Veggie Bowl",
                "ingredients": ["rice", "beans"],
                "steps": ["cook rice", "add beans"],
                "nutrition": {"calories": 420, "protein": "14g"}
            },
            "input_keywords": ["recipe", "dinner"],
            "output_keywords": ["rice", "beans"]
        }"#;
        let reply: RecipeReply = parse_reply(raw).unwrap();
        assert_eq!(reply.recipe.name, "Veggie Bowl");
        assert_eq!(reply.recipe.steps.len(), 2);
    }

    #[test]
    fn test_parse_daily_log_reply() {
        let raw = r#"{
            "log": {"sleep_hours": 7, "sleep_quality": "okay", "mood": "tired", "goal_readiness": 4},
            "tip": {"message": "Ease into the morning with water.", "reason": "short sleep"}
        }"#;
        let reply: DailyLogReply = parse_reply(raw).unwrap();
        assert_eq!(reply.log["sleep_hours"], 7);
        assert!(reply.tip.message.contains("water"));
    }

    #[test]
    fn test_clamp_keywords() {
        let keywords = vec![
            " water ".to_string(),
            "".to_string(),
            "sleep".to_string(),
            "diet".to_string(),
            "yoga".to_string(),
            "running".to_string(),
            "extra".to_string(),
        ];
        let clamped = clamp_keywords(keywords);
        assert_eq!(clamped.len(), MAX_KEYWORDS);
        assert_eq!(clamped[0], "water");
        assert!(!clamped.contains(&"extra".to_string()));
    }
}
