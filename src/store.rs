//! Message persistence over SQLite.
//!
//! Free async functions over the connection pool, one per storage
//! operation. Query ordering follows the read path each operation feeds:
//! browsing reads newest-first, thread views and the context feed read
//! chronologically. `list_recent` orders by rowid: arrival order is the
//! ordering invariant for context building, and timestamps are never
//! trusted to be monotonic.

use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::models::MessageRecord;

fn record_from_row(row: &SqliteRow) -> MessageRecord {
    MessageRecord {
        sender: row.get("sender"),
        content: row.get("content"),
        timestamp: row.get("timestamp"),
        platform: row.get("platform"),
        is_from_owner: row.get("is_from_owner"),
        conversation_id: row.get("conversation_id"),
    }
}

const INSERT_SQL: &str = "INSERT INTO messages (sender, content, timestamp, platform, is_from_owner, conversation_id) VALUES (?, ?, ?, ?, ?, ?)";

/// Insert one record, returning its assigned row id.
pub async fn insert_message(pool: &SqlitePool, record: &MessageRecord) -> Result<i64> {
    let result = sqlx::query(INSERT_SQL)
        .bind(&record.sender)
        .bind(&record.content)
        .bind(record.timestamp)
        .bind(&record.platform)
        .bind(record.is_from_owner)
        .bind(&record.conversation_id)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

/// Insert a batch of records in one transaction, preserving slice order so
/// row ids reflect arrival order. Returns the number inserted.
pub async fn insert_messages(pool: &SqlitePool, records: &[MessageRecord]) -> Result<u64> {
    let mut tx = pool.begin().await?;

    for record in records {
        sqlx::query(INSERT_SQL)
            .bind(&record.sender)
            .bind(&record.content)
            .bind(record.timestamp)
            .bind(&record.platform)
            .bind(record.is_from_owner)
            .bind(&record.conversation_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(records.len() as u64)
}

/// All records, newest first.
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<MessageRecord>> {
    let rows = sqlx::query(
        "SELECT sender, content, timestamp, platform, is_from_owner, conversation_id \
         FROM messages ORDER BY timestamp DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(record_from_row).collect())
}

/// One platform's records, newest first.
pub async fn list_by_platform(pool: &SqlitePool, platform: &str) -> Result<Vec<MessageRecord>> {
    let rows = sqlx::query(
        "SELECT sender, content, timestamp, platform, is_from_owner, conversation_id \
         FROM messages WHERE platform = ? ORDER BY timestamp DESC",
    )
    .bind(platform)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(record_from_row).collect())
}

/// One thread's records, chronological.
pub async fn list_by_conversation(
    pool: &SqlitePool,
    conversation_id: &str,
) -> Result<Vec<MessageRecord>> {
    let rows = sqlx::query(
        "SELECT sender, content, timestamp, platform, is_from_owner, conversation_id \
         FROM messages WHERE conversation_id = ? ORDER BY timestamp ASC",
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(record_from_row).collect())
}

/// Owner-authored records, newest first, bounded.
pub async fn list_owner_messages(pool: &SqlitePool, limit: usize) -> Result<Vec<MessageRecord>> {
    let rows = sqlx::query(
        "SELECT sender, content, timestamp, platform, is_from_owner, conversation_id \
         FROM messages WHERE is_from_owner = 1 ORDER BY timestamp DESC LIMIT ?",
    )
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(record_from_row).collect())
}

/// The arrival-order tail of the store (optionally one thread's), returned
/// oldest-of-the-tail first. This is what feeds the context builder.
pub async fn list_recent(
    pool: &SqlitePool,
    limit: usize,
    conversation_id: Option<&str>,
) -> Result<Vec<MessageRecord>> {
    let rows = match conversation_id {
        Some(conversation) => {
            sqlx::query(
                "SELECT sender, content, timestamp, platform, is_from_owner, conversation_id \
                 FROM messages WHERE conversation_id = ? ORDER BY id DESC LIMIT ?",
            )
            .bind(conversation)
            .bind(limit as i64)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query(
                "SELECT sender, content, timestamp, platform, is_from_owner, conversation_id \
                 FROM messages ORDER BY id DESC LIMIT ?",
            )
            .bind(limit as i64)
            .fetch_all(pool)
            .await?
        }
    };

    let mut records: Vec<MessageRecord> = rows.iter().map(record_from_row).collect();
    records.reverse();
    Ok(records)
}

pub async fn count_messages(pool: &SqlitePool) -> Result<i64> {
    Ok(sqlx::query_scalar("SELECT COUNT(*) FROM messages")
        .fetch_one(pool)
        .await?)
}

pub async fn count_platforms(pool: &SqlitePool) -> Result<i64> {
    Ok(
        sqlx::query_scalar("SELECT COUNT(DISTINCT platform) FROM messages")
            .fetch_one(pool)
            .await?,
    )
}

/// Delete everything. Returns the number of rows removed.
pub async fn delete_all(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM messages").execute(pool).await?;
    Ok(result.rows_affected())
}

/// Delete one platform's records. Returns the number of rows removed.
pub async fn delete_by_platform(pool: &SqlitePool, platform: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM messages WHERE platform = ?")
        .bind(platform)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
