//! Listing stored messages.
//!
//! Browsing reads newest-first; a `--conversation` filter reads the thread
//! chronologically, matching how each view is actually consumed.

use anyhow::Result;

use crate::config::Config;
use crate::db;
use crate::store;

pub async fn run_list(
    config: &Config,
    platform: Option<&str>,
    conversation: Option<&str>,
    limit: Option<usize>,
) -> Result<()> {
    let pool = db::connect(config).await?;
    let mut records = match (platform, conversation) {
        (Some(p), _) => store::list_by_platform(&pool, p).await?,
        (None, Some(c)) => store::list_by_conversation(&pool, c).await?,
        (None, None) => store::list_all(&pool).await?,
    };
    pool.close().await;

    if let Some(limit) = limit {
        records.truncate(limit);
    }

    if records.is_empty() {
        println!("No messages stored.");
        return Ok(());
    }

    println!(
        "{:<17} {:<10} {:<20} {}",
        "TIMESTAMP", "PLATFORM", "SENDER", "CONTENT"
    );
    println!("{}", "-".repeat(76));

    for record in &records {
        // Multi-line bodies show their first line only; `*` marks the owner.
        let first_line = record.content.lines().next().unwrap_or("");
        let sender = if record.is_from_owner {
            format!("{}*", record.sender)
        } else {
            record.sender.clone()
        };
        println!(
            "{:<17} {:<10} {:<20} {}",
            format_ts(record.timestamp),
            record.platform,
            sender,
            first_line
        );
    }

    Ok(())
}

fn format_ts(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}
