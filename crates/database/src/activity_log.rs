//! Daily activity log storage.
//!
//! One row per (phone, calendar day), created lazily on the first log of
//! the day. Logging the other half of the day updates the same row.

use chrono::NaiveDate;
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::models::ActivityLog;
use crate::Result;

/// Which half of the day a log belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogHalf {
    Morning,
    Evening,
}

impl LogHalf {
    fn column_name(&self) -> &'static str {
        match self {
            LogHalf::Morning => "morning_log",
            LogHalf::Evening => "evening_log",
        }
    }
}

/// Store one half of a day's log, creating the row if needed.
///
/// Only the given half is written; the other half, if already logged,
/// is left untouched.
pub async fn upsert_log(
    pool: &SqlitePool,
    phone: &str,
    date: NaiveDate,
    half: LogHalf,
    log: &serde_json::Value,
) -> Result<()> {
    // SQLite doesn't support parameterized column names; the column is
    // constrained to the two values of the LogHalf enum.
    let column = half.column_name();
    let query = format!(
        r#"
        INSERT INTO activity_logs (phone, log_date, {column})
        VALUES (?, ?, ?)
        ON CONFLICT(phone, log_date) DO UPDATE SET
            {column} = excluded.{column},
            updated_at = datetime('now')
        "#
    );

    sqlx::query(&query)
        .bind(phone)
        .bind(date)
        .bind(Json(log))
        .execute(pool)
        .await?;

    Ok(())
}

/// Get the log row for a phone and day, if any.
pub async fn get_for_day(
    pool: &SqlitePool,
    phone: &str,
    date: NaiveDate,
) -> Result<Option<ActivityLog>> {
    let record = sqlx::query_as::<_, ActivityLog>(
        r#"
        SELECT id, phone, log_date, morning_log, evening_log, updated_at
        FROM activity_logs
        WHERE phone = ? AND log_date = ?
        "#,
    )
    .bind(phone)
    .bind(date)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// All log rows for a phone, newest day first.
pub async fn find_by_phone(pool: &SqlitePool, phone: &str) -> Result<Vec<ActivityLog>> {
    let records = sqlx::query_as::<_, ActivityLog>(
        r#"
        SELECT id, phone, log_date, morning_log, evening_log, updated_at
        FROM activity_logs
        WHERE phone = ?
        ORDER BY log_date DESC
        "#,
    )
    .bind(phone)
    .fetch_all(pool)
    .await?;

    Ok(records)
}
