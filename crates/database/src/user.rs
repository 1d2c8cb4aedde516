//! User profile storage.
//!
//! Profiles are upserted, never deleted. First contact seeds an empty
//! profile at onboarding step 0; every subsequent turn loads the row,
//! mutates it in memory, and writes it back. Concurrent turns from the
//! same phone race this read-modify-write with last-write-wins semantics
//! (a documented consistency gap, see DESIGN.md).

use sqlx::SqlitePool;

use crate::models::UserProfile;
use crate::Result;

const PROFILE_COLUMNS: &str = r#"
    phone, name, dob, age, sex, height_cm, weight_kg, bmi, goals,
    diet_preference, allergies, meal_frequency, onboarding_step,
    onboarding_complete, points, current_streak, last_interaction,
    extra_info, created_at, updated_at
"#;

/// Find a profile by phone.
pub async fn find_by_phone(pool: &SqlitePool, phone: &str) -> Result<Option<UserProfile>> {
    let query = format!(
        "SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE phone = ?"
    );
    let record = sqlx::query_as::<_, UserProfile>(&query)
        .bind(phone)
        .fetch_optional(pool)
        .await?;

    Ok(record)
}

/// Load a profile, creating an empty one at onboarding step 0 on first
/// contact.
pub async fn get_or_create(pool: &SqlitePool, phone: &str) -> Result<UserProfile> {
    sqlx::query(
        r#"
        INSERT INTO user_profiles (phone)
        VALUES (?)
        ON CONFLICT(phone) DO NOTHING
        "#,
    )
    .bind(phone)
    .execute(pool)
    .await?;

    let query = format!(
        "SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE phone = ?"
    );
    let record = sqlx::query_as::<_, UserProfile>(&query)
        .bind(phone)
        .fetch_one(pool)
        .await?;

    Ok(record)
}

/// Write a profile back, creating the row if it does not exist.
///
/// All mutable fields are written; `created_at` is preserved and
/// `updated_at` refreshed.
pub async fn upsert(pool: &SqlitePool, profile: &UserProfile) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_profiles (
            phone, name, dob, age, sex, height_cm, weight_kg, bmi, goals,
            diet_preference, allergies, meal_frequency, onboarding_step,
            onboarding_complete, points, current_streak, last_interaction,
            extra_info
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(phone) DO UPDATE SET
            name = excluded.name,
            dob = excluded.dob,
            age = excluded.age,
            sex = excluded.sex,
            height_cm = excluded.height_cm,
            weight_kg = excluded.weight_kg,
            bmi = excluded.bmi,
            goals = excluded.goals,
            diet_preference = excluded.diet_preference,
            allergies = excluded.allergies,
            meal_frequency = excluded.meal_frequency,
            onboarding_step = excluded.onboarding_step,
            onboarding_complete = excluded.onboarding_complete,
            points = excluded.points,
            current_streak = excluded.current_streak,
            last_interaction = excluded.last_interaction,
            extra_info = excluded.extra_info,
            updated_at = datetime('now')
        "#,
    )
    .bind(&profile.phone)
    .bind(&profile.name)
    .bind(&profile.dob)
    .bind(profile.age)
    .bind(&profile.sex)
    .bind(profile.height_cm)
    .bind(profile.weight_kg)
    .bind(profile.bmi)
    .bind(&profile.goals)
    .bind(&profile.diet_preference)
    .bind(&profile.allergies)
    .bind(&profile.meal_frequency)
    .bind(profile.onboarding_step)
    .bind(profile.onboarding_complete)
    .bind(profile.points)
    .bind(profile.current_streak)
    .bind(profile.last_interaction)
    .bind(&profile.extra_info)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use chrono::{TimeZone, Utc};

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_find_by_phone_missing() {
        let db = test_db().await;
        let profile = find_by_phone(db.pool(), "+1234567890").await.unwrap();
        assert!(profile.is_none());
    }

    #[tokio::test]
    async fn test_upsert_roundtrip() {
        let db = test_db().await;
        let mut profile = get_or_create(db.pool(), "+1234567890").await.unwrap();

        profile.name = Some("Asha".to_string());
        profile.dob = Some("2000-06-15".to_string());
        profile.age = Some(24);
        profile.height_cm = Some(170);
        profile.weight_kg = Some(65.0);
        profile.bmi = Some(22.5);
        profile.goals.0 = vec!["lose weight".to_string(), "sleep better".to_string()];
        profile.onboarding_step = 6;
        profile.points = 25;
        profile.current_streak = 3;
        profile.last_interaction = Some(Utc.with_ymd_and_hms(2024, 6, 15, 8, 0, 0).unwrap());

        upsert(db.pool(), &profile).await.unwrap();

        let fetched = find_by_phone(db.pool(), "+1234567890")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.name.as_deref(), Some("Asha"));
        assert_eq!(fetched.goals.0.len(), 2);
        assert_eq!(fetched.onboarding_step, 6);
        assert_eq!(fetched.points, 25);
        assert_eq!(
            fetched.last_interaction,
            Some(Utc.with_ymd_and_hms(2024, 6, 15, 8, 0, 0).unwrap())
        );
        assert_eq!(fetched.created_at, profile.created_at);
    }

    #[tokio::test]
    async fn test_extra_info_carries_schema_version() {
        let db = test_db().await;
        let profile = get_or_create(db.pool(), "+1234567890").await.unwrap();
        assert_eq!(profile.extra_info.0["schema_version"], 1);
    }
}
