//! Chat exchange storage: append-only history with keyword and embedding
//! read paths.

use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::embedding;
use crate::models::{Exchange, NewExchange};
use crate::Result;

/// Append a new exchange.
pub async fn append(pool: &SqlitePool, exchange: &NewExchange) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO exchanges (
            phone, user_message, bot_response, user_keywords, bot_keywords, embedding
        )
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&exchange.phone)
    .bind(&exchange.user_message)
    .bind(&exchange.bot_response)
    .bind(Json(&exchange.user_keywords))
    .bind(Json(&exchange.bot_keywords))
    .bind(embedding::encode(&exchange.embedding))
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// All exchanges for a phone, oldest first.
pub async fn find_by_phone(pool: &SqlitePool, phone: &str) -> Result<Vec<Exchange>> {
    let records = sqlx::query_as::<_, Exchange>(
        r#"
        SELECT id, phone, user_message, bot_response, user_keywords,
               bot_keywords, embedding, created_at
        FROM exchanges
        WHERE phone = ?
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(phone)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// The most recent `limit` exchanges for a phone, newest first.
///
/// This is the candidate pool for semantic recall; `limit` plays the role
/// of an approximate-nearest-neighbor search breadth.
pub async fn recent(pool: &SqlitePool, phone: &str, limit: i64) -> Result<Vec<Exchange>> {
    let records = sqlx::query_as::<_, Exchange>(
        r#"
        SELECT id, phone, user_message, bot_response, user_keywords,
               bot_keywords, embedding, created_at
        FROM exchanges
        WHERE phone = ?
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(phone)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Per-exchange user keyword sets for a phone, oldest first.
///
/// Feeds keyword frequency and co-occurrence aggregation without pulling
/// message bodies or embeddings off disk.
pub async fn user_keywords_by_phone(
    pool: &SqlitePool,
    phone: &str,
) -> Result<Vec<Vec<String>>> {
    let rows = sqlx::query_as::<_, (Json<Vec<String>>,)>(
        r#"
        SELECT user_keywords
        FROM exchanges
        WHERE phone = ?
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(phone)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(keywords,)| keywords.0).collect())
}

/// Every distinct phone with at least one exchange.
pub async fn distinct_phones(pool: &SqlitePool) -> Result<Vec<String>> {
    let rows = sqlx::query_as::<_, (String,)>(
        r#"
        SELECT DISTINCT phone FROM exchanges ORDER BY phone
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(phone,)| phone).collect())
}

/// Number of exchanges stored for a phone.
pub async fn count_by_phone(pool: &SqlitePool, phone: &str) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM exchanges WHERE phone = ?
        "#,
    )
    .bind(phone)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
