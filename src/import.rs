//! Import pipeline orchestration.
//!
//! Coordinates the full import flow: read the export file, parse it into
//! records, reject an empty result, and batch-insert into SQLite. An empty
//! result is the one parsing condition surfaced to the user: the file is
//! most likely not a recognized export format.

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::db;
use crate::error::Error;
use crate::parser;
use crate::store;

pub async fn run_import(
    config: &Config,
    file: &Path,
    platform: &str,
    conversation_id: Option<String>,
    dry_run: bool,
) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read export file: {}", file.display()))?;

    let conversation = conversation_id.unwrap_or_else(|| format!("{platform}_main"));
    let records = parser::parse_export(&raw, &config.owner.name, platform, &conversation);

    if records.is_empty() {
        return Err(Error::EmptyImport.into());
    }

    let owner_count = records.iter().filter(|r| r.is_from_owner).count();

    if dry_run {
        println!("import {} (dry-run)", platform);
        println!("  file: {}", file.display());
        println!("  messages parsed: {}", records.len());
        println!("  owner-authored: {}", owner_count);
        return Ok(());
    }

    let pool = db::connect(config).await?;
    let inserted = store::insert_messages(&pool, &records).await?;
    pool.close().await;

    println!("import {}", platform);
    println!("  file: {}", file.display());
    println!("  conversation: {}", conversation);
    println!("  messages parsed: {}", records.len());
    println!("  owner-authored: {}", owner_count);
    println!("  inserted: {}", inserted);
    println!("ok");

    Ok(())
}
