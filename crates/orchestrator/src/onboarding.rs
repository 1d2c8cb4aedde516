//! Onboarding state machine.
//!
//! A strictly linear sequence of steps, each consuming exactly one
//! free-text reply and producing one profile update plus the next prompt.
//! A reply that fails validation re-sends the same step's prompt without
//! touching the step index or the profile, so the machine is idempotent
//! under repeated invalid input.

use chrono::{Datelike, NaiveDate};
use database::UserProfile;
use tracing::debug;

/// Points awarded once the final onboarding step is answered.
pub const ONBOARDING_BONUS_POINTS: i64 = 50;

/// The onboarding steps, in order. The step index stored on the profile is
/// the step whose question the next inbound message answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStep {
    /// First contact; any text starts the flow.
    Intro,
    Name,
    DateOfBirth,
    Height,
    Weight,
    Sex,
    Goals,
    DietPreference,
    Allergies,
    MealFrequency,
}

impl OnboardingStep {
    /// All steps in transition order.
    pub const ALL: [OnboardingStep; 10] = [
        OnboardingStep::Intro,
        OnboardingStep::Name,
        OnboardingStep::DateOfBirth,
        OnboardingStep::Height,
        OnboardingStep::Weight,
        OnboardingStep::Sex,
        OnboardingStep::Goals,
        OnboardingStep::DietPreference,
        OnboardingStep::Allergies,
        OnboardingStep::MealFrequency,
    ];

    /// Look up a step by its stored index.
    pub fn from_index(index: i64) -> Option<Self> {
        Self::ALL.get(usize::try_from(index).ok()?).copied()
    }

    /// The stored index of this step.
    pub fn index(&self) -> i64 {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0) as i64
    }

    /// The question asked when entering this step.
    pub fn prompt(&self) -> &'static str {
        match self {
            OnboardingStep::Intro => "",
            OnboardingStep::Name => "What's your name?",
            OnboardingStep::DateOfBirth => {
                "What's your date of birth? (DD-MM-YYYY or DD/MM/YYYY)"
            }
            OnboardingStep::Height => "What's your height in centimeters?",
            OnboardingStep::Weight => "What's your weight in kilograms?",
            OnboardingStep::Sex => "What's your sex?",
            OnboardingStep::Goals => {
                "What are your wellness goals? (comma-separated, e.g. lose weight, sleep better)"
            }
            OnboardingStep::DietPreference => {
                "Do you follow a diet preference? (e.g. vegetarian, vegan, none)"
            }
            OnboardingStep::Allergies => "Any food allergies I should know about?",
            OnboardingStep::MealFrequency => "How many meals do you usually have per day?",
        }
    }
}

/// Welcome text sent on first contact, before the name question.
pub const INTRO_TEXT: &str =
    "👋 Welcome to Vita, your personal wellness assistant! Let's set up your profile.";

/// The outcome of feeding one reply into the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The reply was accepted; the profile was updated and the step
    /// advanced. `reply` carries the next prompt (or the completion
    /// message).
    Advanced { reply: String },
    /// The reply failed validation; nothing was mutated and `reply`
    /// re-states the same step's prompt.
    Rejected { reply: String },
}

impl StepOutcome {
    /// The outbound reply text for either outcome.
    pub fn reply(&self) -> &str {
        match self {
            StepOutcome::Advanced { reply } => reply,
            StepOutcome::Rejected { reply } => reply,
        }
    }
}

/// Feed one free-text reply into the state machine.
///
/// On success the profile is mutated in place (field for the current step,
/// step index, and on the terminal step the completion flag and bonus
/// points) and the next prompt is returned. On validation failure the
/// profile is untouched and the same prompt is re-sent.
pub fn advance(profile: &mut UserProfile, text: &str, today: NaiveDate) -> StepOutcome {
    let step = match OnboardingStep::from_index(profile.onboarding_step) {
        Some(step) => step,
        None => {
            // A step index past the end with the completion flag unset
            // should not happen; repair by completing.
            profile.onboarding_complete = true;
            return StepOutcome::Advanced {
                reply: completion_message(profile),
            };
        }
    };

    match step {
        OnboardingStep::Intro => {
            // Any text starts the flow.
        }
        OnboardingStep::Name => {
            if text.is_empty() {
                return rejected("Please tell me your name.", step);
            }
            profile.name = Some(text.to_string());
        }
        OnboardingStep::DateOfBirth => {
            let dob = match parse_dob(text) {
                Some(dob) if dob <= today => dob,
                _ => {
                    return rejected("That doesn't look like a valid date of birth.", step);
                }
            };
            profile.dob = Some(dob.format("%Y-%m-%d").to_string());
            profile.age = Some(calculate_age(dob, today));
        }
        OnboardingStep::Height => {
            let height: i64 = match text.parse() {
                Ok(height) if height > 0 => height,
                _ => {
                    return rejected("Please send your height as a whole number of centimeters.", step);
                }
            };
            profile.height_cm = Some(height);
        }
        OnboardingStep::Weight => {
            let weight: f64 = match text.parse() {
                Ok(weight) if weight > 0.0 => weight,
                _ => {
                    return rejected("Please send your weight as a positive number of kilograms.", step);
                }
            };
            profile.weight_kg = Some(weight);
            if let Some(height) = profile.height_cm {
                profile.bmi = Some(calculate_bmi(height, weight));
            }
        }
        OnboardingStep::Sex => {
            profile.sex = Some(text.to_string());
        }
        OnboardingStep::Goals => {
            let goals: Vec<String> = text
                .split(',')
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty())
                .collect();
            if goals.is_empty() {
                return rejected("Please share at least one goal.", step);
            }
            profile.goals.0 = goals;
        }
        OnboardingStep::DietPreference => {
            profile.diet_preference = Some(text.to_string());
        }
        OnboardingStep::Allergies => {
            profile.allergies = Some(text.to_string());
        }
        OnboardingStep::MealFrequency => {
            profile.meal_frequency = Some(text.to_string());
        }
    }

    profile.onboarding_step += 1;
    debug!(
        "Onboarding for {} advanced to step {}",
        profile.phone, profile.onboarding_step
    );

    match OnboardingStep::from_index(profile.onboarding_step) {
        Some(next) => {
            let reply = if step == OnboardingStep::Intro {
                format!("{}\n\n{}", INTRO_TEXT, next.prompt())
            } else {
                next.prompt().to_string()
            };
            StepOutcome::Advanced { reply }
        }
        None => {
            profile.onboarding_complete = true;
            profile.points += ONBOARDING_BONUS_POINTS;
            StepOutcome::Advanced {
                reply: completion_message(profile),
            }
        }
    }
}

fn rejected(problem: &str, step: OnboardingStep) -> StepOutcome {
    StepOutcome::Rejected {
        reply: format!("{}\n\n{}", problem, step.prompt()),
    }
}

fn completion_message(profile: &UserProfile) -> String {
    let name = profile.name.as_deref().unwrap_or("friend");
    format!(
        "🎉 You're all set, {}! Your profile is complete and you've earned \
         {} bonus points. Say 'help' anytime to see what I can do.",
        name, ONBOARDING_BONUS_POINTS
    )
}

/// Parse a date of birth in `DD-MM-YYYY` or `DD/MM/YYYY` form.
///
/// Calendar-invalid dates (e.g. 31-02-2000) are rejected.
pub fn parse_dob(input: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = input.trim().split(['-', '/']).collect();
    if parts.len() != 3 {
        return None;
    }

    let day: u32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let year: i32 = parts[2].parse().ok()?;
    // Reject two-digit years and similar noise up front.
    if !(1900..=9999).contains(&year) {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Age in whole years at `today`, with calendar-aware subtraction: the
/// year difference is decremented when today's month/day precedes the
/// birth month/day.
pub fn calculate_age(dob: NaiveDate, today: NaiveDate) -> i64 {
    let mut age = i64::from(today.year() - dob.year());
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// Body mass index from height in centimeters and weight in kilograms,
/// rounded to one decimal.
pub fn calculate_bmi(height_cm: i64, weight_kg: f64) -> f64 {
    let height_m = height_cm as f64 / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    (bmi * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::types::Json;

    fn blank_profile(step: i64) -> UserProfile {
        UserProfile {
            phone: "+1234567890".to_string(),
            name: None,
            dob: None,
            age: None,
            sex: None,
            height_cm: None,
            weight_kg: None,
            bmi: None,
            goals: Json(vec![]),
            diet_preference: None,
            allergies: None,
            meal_frequency: None,
            onboarding_step: step,
            onboarding_complete: false,
            points: 0,
            current_streak: 0,
            last_interaction: None,
            extra_info: Json(serde_json::json!({"schema_version": 1})),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_dob_formats() {
        assert_eq!(parse_dob("15-06-2000"), Some(day(2000, 6, 15)));
        assert_eq!(parse_dob("15/06/2000"), Some(day(2000, 6, 15)));
        assert_eq!(parse_dob(" 1-1-1990 "), Some(day(1990, 1, 1)));
    }

    #[test]
    fn test_parse_dob_rejects_invalid() {
        // Calendar-invalid
        assert_eq!(parse_dob("31-02-2000"), None);
        // Wrong field order (year first)
        assert_eq!(parse_dob("2000-06-15"), None);
        // Not a date at all
        assert_eq!(parse_dob("abc"), None);
        assert_eq!(parse_dob("15-06"), None);
        assert_eq!(parse_dob(""), None);
    }

    #[test]
    fn test_calculate_age_around_birthday() {
        let dob = day(2000, 6, 15);
        assert_eq!(calculate_age(dob, day(2024, 6, 14)), 23);
        assert_eq!(calculate_age(dob, day(2024, 6, 15)), 24);
        assert_eq!(calculate_age(dob, day(2024, 6, 16)), 24);
    }

    #[test]
    fn test_calculate_bmi() {
        assert_eq!(calculate_bmi(170, 65.0), 22.5);
        // Idempotent under recomputation
        assert_eq!(calculate_bmi(170, 65.0), calculate_bmi(170, 65.0));
    }

    #[test]
    fn test_intro_advances_to_name() {
        let mut profile = blank_profile(0);
        let outcome = advance(&mut profile, "hi", day(2024, 6, 15));

        assert_eq!(profile.onboarding_step, 1);
        assert!(!profile.onboarding_complete);
        match outcome {
            StepOutcome::Advanced { reply } => {
                assert!(reply.contains("Welcome to Vita"));
                assert!(reply.contains(OnboardingStep::Name.prompt()));
            }
            other => panic!("expected Advanced, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_dob_reprompts_without_mutation() {
        for input in ["31-02-2000", "2000-06-15", "abc"] {
            let mut profile = blank_profile(2);
            profile.name = Some("Asha".to_string());
            let outcome = advance(&mut profile, input, day(2024, 6, 15));

            assert_eq!(profile.onboarding_step, 2, "input {input:?} advanced the step");
            assert!(profile.dob.is_none());
            assert!(profile.age.is_none());
            match outcome {
                StepOutcome::Rejected { reply } => {
                    assert!(reply.contains(OnboardingStep::DateOfBirth.prompt()));
                }
                other => panic!("expected Rejected for {input:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_future_dob_rejected() {
        let mut profile = blank_profile(2);
        let outcome = advance(&mut profile, "15-06-2030", day(2024, 6, 15));
        assert!(matches!(outcome, StepOutcome::Rejected { .. }));
        assert_eq!(profile.onboarding_step, 2);
    }

    #[test]
    fn test_dob_sets_age() {
        let mut profile = blank_profile(2);
        advance(&mut profile, "15-06-2000", day(2024, 6, 14));
        assert_eq!(profile.dob.as_deref(), Some("2000-06-15"));
        assert_eq!(profile.age, Some(23));
        assert_eq!(profile.onboarding_step, 3);
    }

    #[test]
    fn test_height_rejects_non_numeric() {
        let mut profile = blank_profile(3);
        let outcome = advance(&mut profile, "tall", day(2024, 6, 15));
        assert!(matches!(outcome, StepOutcome::Rejected { .. }));
        assert!(profile.height_cm.is_none());
        assert_eq!(profile.onboarding_step, 3);
    }

    #[test]
    fn test_weight_computes_bmi() {
        let mut profile = blank_profile(4);
        profile.height_cm = Some(170);
        advance(&mut profile, "65.0", day(2024, 6, 15));
        assert_eq!(profile.weight_kg, Some(65.0));
        assert_eq!(profile.bmi, Some(22.5));
    }

    #[test]
    fn test_weight_rejects_non_positive() {
        for input in ["-4", "0", "heavy"] {
            let mut profile = blank_profile(4);
            profile.height_cm = Some(170);
            let outcome = advance(&mut profile, input, day(2024, 6, 15));
            assert!(matches!(outcome, StepOutcome::Rejected { .. }));
            assert!(profile.weight_kg.is_none());
        }
    }

    #[test]
    fn test_goals_split_and_trimmed() {
        let mut profile = blank_profile(6);
        advance(
            &mut profile,
            "lose weight ,  sleep better,, more energy",
            day(2024, 6, 15),
        );
        assert_eq!(
            profile.goals.0,
            vec!["lose weight", "sleep better", "more energy"]
        );
    }

    #[test]
    fn test_final_step_completes_and_awards_bonus() {
        let mut profile = blank_profile(9);
        profile.name = Some("Asha".to_string());
        let outcome = advance(&mut profile, "3 meals", day(2024, 6, 15));

        assert!(profile.onboarding_complete);
        assert_eq!(profile.points, ONBOARDING_BONUS_POINTS);
        assert_eq!(profile.meal_frequency.as_deref(), Some("3 meals"));
        match outcome {
            StepOutcome::Advanced { reply } => {
                assert!(reply.contains("Asha"));
                assert!(reply.contains("50"));
            }
            other => panic!("expected Advanced, got {:?}", other),
        }
    }

    #[test]
    fn test_full_walkthrough() {
        let mut profile = blank_profile(0);
        let today = day(2024, 6, 16);
        let replies = [
            "hi",
            "Asha",
            "15-06-2000",
            "170",
            "65.0",
            "female",
            "lose weight, sleep better",
            "vegetarian",
            "peanuts",
            "3",
        ];

        for reply in replies {
            let outcome = advance(&mut profile, reply, today);
            assert!(
                matches!(outcome, StepOutcome::Advanced { .. }),
                "reply {reply:?} was rejected"
            );
        }

        assert!(profile.onboarding_complete);
        assert_eq!(profile.points, 50);
        assert_eq!(profile.age, Some(24));
        assert_eq!(profile.bmi, Some(22.5));
        assert_eq!(profile.diet_preference.as_deref(), Some("vegetarian"));
        assert_eq!(profile.allergies.as_deref(), Some("peanuts"));
    }

    #[test]
    fn test_repeated_invalid_input_is_idempotent() {
        let mut profile = blank_profile(2);
        let first = advance(&mut profile, "nope", day(2024, 6, 15));
        let second = advance(&mut profile, "nope", day(2024, 6, 15));
        assert_eq!(first, second);
        assert_eq!(profile.onboarding_step, 2);
    }
}
