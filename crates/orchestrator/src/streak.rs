//! Streak engine.
//!
//! Streaks count consecutive calendar days with at least one interaction.
//! The gap is measured in whole calendar days between the stored
//! last-interaction timestamp and now, not in elapsed hours, so a message
//! at 23:59 followed by one at 00:01 continues the streak.

use chrono::{DateTime, Utc};
use database::UserProfile;

/// Points for the first interaction of a streak day.
pub const DAILY_POINTS: i64 = 5;

/// Points for coming back after a broken streak.
pub const COMEBACK_POINTS: i64 = 1;

/// Update the streak and points on a profile for an interaction at `now`.
///
/// Returns the streak announcement to append to the reply, or `None` when
/// the user already interacted today. `last_interaction` is set to `now`
/// in every branch. The caller persists the profile; this update and that
/// write form one logical step per inbound message.
pub fn update(profile: &mut UserProfile, now: DateTime<Utc>) -> Option<String> {
    let gap_days = profile
        .last_interaction
        .map(|last| (now.date_naive() - last.date_naive()).num_days());
    profile.last_interaction = Some(now);

    match gap_days {
        None => {
            profile.current_streak = 1;
            profile.points += DAILY_POINTS;
            Some(format!(
                "🔥 Streak started! Day 1, +{} points (total: {}).",
                DAILY_POINTS, profile.points
            ))
        }
        Some(1) => {
            profile.current_streak += 1;
            profile.points += DAILY_POINTS;
            Some(format!(
                "🔥 {}-day streak! +{} points (total: {}).",
                profile.current_streak, DAILY_POINTS, profile.points
            ))
        }
        Some(gap) if gap > 1 => {
            profile.current_streak = 1;
            profile.points += COMEBACK_POINTS;
            Some(format!(
                "🌱 Fresh start! Back to day 1, +{} point (total: {}).",
                COMEBACK_POINTS, profile.points
            ))
        }
        // Same day (or a clock running backwards): nothing changes.
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sqlx::types::Json;

    fn profile_with(streak: i64, points: i64, last: Option<DateTime<Utc>>) -> UserProfile {
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
            onboarding_step: 10,
            onboarding_complete: true,
            points,
            current_streak: streak,
            last_interaction: last,
            extra_info: Json(serde_json::json!({"schema_version": 1})),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_first_interaction() {
        let mut profile = profile_with(0, 0, None);
        let announcement = update(&mut profile, at(2024, 6, 15, 9));

        assert_eq!(profile.current_streak, 1);
        assert_eq!(profile.points, 5);
        assert_eq!(profile.last_interaction, Some(at(2024, 6, 15, 9)));
        assert!(announcement.unwrap().contains("Day 1"));
    }

    #[test]
    fn test_next_day_continues_streak() {
        let mut profile = profile_with(3, 20, Some(at(2024, 6, 14, 22)));
        let announcement = update(&mut profile, at(2024, 6, 15, 7));

        assert_eq!(profile.current_streak, 4);
        assert_eq!(profile.points, 25);
        let text = announcement.unwrap();
        assert!(text.contains("4-day streak"));
        assert!(text.contains("25"));
    }

    #[test]
    fn test_midnight_boundary_counts_as_next_day() {
        let mut profile = profile_with(1, 5, Some(at(2024, 6, 14, 23)));
        // 8 hours later but a calendar day has turned over
        let announcement = update(&mut profile, at(2024, 6, 15, 7));
        assert_eq!(profile.current_streak, 2);
        assert!(announcement.is_some());
    }

    #[test]
    fn test_same_day_changes_nothing() {
        let mut profile = profile_with(3, 20, Some(at(2024, 6, 15, 8)));
        let announcement = update(&mut profile, at(2024, 6, 15, 20));

        assert_eq!(profile.current_streak, 3);
        assert_eq!(profile.points, 20);
        assert!(announcement.is_none());
        // last_interaction still moves forward
        assert_eq!(profile.last_interaction, Some(at(2024, 6, 15, 20)));
    }

    #[test]
    fn test_two_day_gap_resets() {
        let mut profile = profile_with(7, 50, Some(at(2024, 6, 13, 9)));
        let announcement = update(&mut profile, at(2024, 6, 15, 9));

        assert_eq!(profile.current_streak, 1);
        assert_eq!(profile.points, 51);
        assert!(announcement.unwrap().contains("Fresh start"));
    }
}
