//! Deleting stored messages, wholesale or per platform.

use anyhow::Result;

use crate::config::Config;
use crate::db;
use crate::store;

pub async fn run_clear(config: &Config, platform: Option<&str>) -> Result<()> {
    let pool = db::connect(config).await?;
    let deleted = match platform {
        Some(p) => store::delete_by_platform(&pool, p).await?,
        None => store::delete_all(&pool).await?,
    };
    pool.close().await;

    match platform {
        Some(p) => println!("Deleted {} message(s) for platform '{}'.", deleted, p),
        None => println!("Deleted {} message(s).", deleted),
    }
    Ok(())
}
