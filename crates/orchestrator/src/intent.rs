//! Quick commands and intent classification.
//!
//! Classification is a deliberately crude substring test evaluated in
//! fixed priority: recipe before tip before log before the chat fallback.
//! The priority order is observable behavior ("log my recipe attempt"
//! is a recipe request).

use database::activity_log::LogHalf;

/// Exact-match commands that short-circuit for onboarded users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickCommand {
    /// A bare greeting.
    Greeting,
    /// Show the command overview.
    Help,
    /// Show the stored profile.
    Profile,
}

/// Match an exact quick command, case-insensitively.
pub fn quick_command(text: &str) -> Option<QuickCommand> {
    match text.trim().to_lowercase().as_str() {
        "hi" | "hello" => Some(QuickCommand::Greeting),
        "help" => Some(QuickCommand::Help),
        "profile" => Some(QuickCommand::Profile),
        _ => None,
    }
}

/// The coarse intent of a free-form message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Recipe suggestion.
    Recipe,
    /// One-shot health tip.
    Tip,
    /// Morning or evening daily log.
    Log(LogHalf),
    /// Generic wellness chat.
    Chat,
}

/// Classify a message by substring, in fixed priority order.
pub fn classify(text: &str) -> Intent {
    let lower = text.to_lowercase();

    if lower.contains("recipe") {
        return Intent::Recipe;
    }
    if lower.contains("tip") {
        return Intent::Tip;
    }
    if lower.contains("log") {
        let half = if lower.contains("morning") {
            LogHalf::Morning
        } else {
            LogHalf::Evening
        };
        return Intent::Log(half);
    }
    Intent::Chat
}

/// Whether a log message is just the trigger phrase, with no answers yet.
///
/// "log morning" asks for the question template; "morning log: 7 hours,
/// okay, tired, 4" carries the answers.
pub fn is_bare_log_trigger(text: &str) -> bool {
    text.split_whitespace().count() <= 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_commands() {
        assert_eq!(quick_command("hi"), Some(QuickCommand::Greeting));
        assert_eq!(quick_command("  Hello "), Some(QuickCommand::Greeting));
        assert_eq!(quick_command("HELP"), Some(QuickCommand::Help));
        assert_eq!(quick_command("profile"), Some(QuickCommand::Profile));
        // Not exact matches
        assert_eq!(quick_command("hi there"), None);
        assert_eq!(quick_command("help me sleep"), None);
    }

    #[test]
    fn test_classify_priority_order() {
        assert_eq!(classify("suggest a dinner recipe"), Intent::Recipe);
        // recipe wins over log
        assert_eq!(classify("log my recipe attempt"), Intent::Recipe);
        // tip wins over log
        assert_eq!(classify("tip for my log"), Intent::Tip);
        assert_eq!(classify("log evening"), Intent::Log(LogHalf::Evening));
        assert_eq!(classify("morning log"), Intent::Log(LogHalf::Morning));
        assert_eq!(classify("how do I sleep better?"), Intent::Chat);
    }

    #[test]
    fn test_log_defaults_to_evening() {
        assert_eq!(classify("log my day"), Intent::Log(LogHalf::Evening));
    }

    #[test]
    fn test_bare_log_trigger() {
        assert!(is_bare_log_trigger("log"));
        assert!(is_bare_log_trigger("log morning"));
        assert!(is_bare_log_trigger("my evening log"));
        assert!(!is_bare_log_trigger(
            "morning log: 7 hours, okay, tired, 4"
        ));
        assert!(!is_bare_log_trigger("log 6 glasses yes strength 45"));
    }
}
