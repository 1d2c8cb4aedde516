//! Derived behaviour profile storage.
//!
//! Behaviour rows are a cache over exchange history. The refresh batch
//! replaces every derived field in one upsert; rows are never patched
//! incrementally, so a row can always be rebuilt from exchanges alone.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::SqlitePool;
use std::collections::BTreeMap;

use crate::models::UserBehaviour;
use crate::Result;

/// Replace the behaviour profile for a phone with freshly computed values.
pub async fn replace(
    pool: &SqlitePool,
    phone: &str,
    top_keywords: &[String],
    cooccurrence: &BTreeMap<String, BTreeMap<String, i64>>,
    total_messages: i64,
    last_interaction: Option<DateTime<Utc>>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_behaviours (
            phone, top_keywords, cooccurrence, total_messages, last_interaction
        )
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(phone) DO UPDATE SET
            top_keywords = excluded.top_keywords,
            cooccurrence = excluded.cooccurrence,
            total_messages = excluded.total_messages,
            last_interaction = excluded.last_interaction,
            updated_at = datetime('now')
        "#,
    )
    .bind(phone)
    .bind(Json(top_keywords))
    .bind(Json(cooccurrence))
    .bind(total_messages)
    .bind(last_interaction)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get the behaviour profile for a phone, if one has been computed.
pub async fn get(pool: &SqlitePool, phone: &str) -> Result<Option<UserBehaviour>> {
    let record = sqlx::query_as::<_, UserBehaviour>(
        r#"
        SELECT phone, top_keywords, cooccurrence, total_messages,
               last_interaction, updated_at
        FROM user_behaviours
        WHERE phone = ?
        "#,
    )
    .bind(phone)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}
