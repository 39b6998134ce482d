//! Database statistics and health overview.
//!
//! Provides a quick summary of what's stored: message counts, owner-message
//! coverage, and per-platform breakdowns. Used by `mimic stats` to give
//! confidence that imports landed as expected.

use anyhow::Result;
use sqlx::Row;

use crate::config::Config;
use crate::db;
use crate::store;

/// Per-platform breakdown of stored messages.
struct PlatformStats {
    platform: String,
    message_count: i64,
    owner_count: i64,
    last_ts: i64,
}

/// Run the stats command: query the database and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;

    let total_messages = store::count_messages(&pool).await?;
    let total_platforms = store::count_platforms(&pool).await?;

    let owner_messages: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE is_from_owner = 1")
            .fetch_one(&pool)
            .await?;

    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("mimic — Database Stats");
    println!("======================");
    println!();
    println!("  Database:   {}", config.db.path.display());
    println!("  Size:       {}", format_bytes(db_size));
    println!();
    println!("  Messages:   {}", total_messages);
    println!(
        "  Owner:      {} / {} ({}%)",
        owner_messages,
        total_messages,
        if total_messages > 0 {
            (owner_messages * 100) / total_messages
        } else {
            0
        }
    );
    println!("  Platforms:  {}", total_platforms);

    let platform_rows = sqlx::query(
        r#"
        SELECT
            platform,
            COUNT(*) AS message_count,
            SUM(is_from_owner) AS owner_count,
            MAX(timestamp) AS last_ts
        FROM messages
        GROUP BY platform
        ORDER BY message_count DESC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    let platform_stats: Vec<PlatformStats> = platform_rows
        .iter()
        .map(|row| PlatformStats {
            platform: row.get("platform"),
            message_count: row.get("message_count"),
            owner_count: row.get("owner_count"),
            last_ts: row.get("last_ts"),
        })
        .collect();

    if !platform_stats.is_empty() {
        println!();
        println!("  By platform:");
        println!(
            "  {:<16} {:>9} {:>7}   {}",
            "PLATFORM", "MESSAGES", "OWNER", "LAST MESSAGE"
        );
        println!("  {}", "-".repeat(56));

        for s in &platform_stats {
            println!(
                "  {:<16} {:>9} {:>7}   {}",
                s.platform,
                s.message_count,
                s.owner_count,
                format_ts_iso(s.last_ts)
            );
        }
    }

    println!();

    pool.close().await;
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

fn format_ts_iso(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}
