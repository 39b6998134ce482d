//! Reply generation: history tail → context → completion call.
//!
//! Loads the arrival-order tail of stored history (bounded by
//! `context.history_limit`), builds the turn list, and submits one
//! completion request. No retry here: a completion failure is reported
//! and the user decides whether to run the command again.

use anyhow::{bail, Result};

use crate::completion;
use crate::config::Config;
use crate::context;
use crate::db;
use crate::store;

pub async fn run_reply(
    config: &Config,
    text: &str,
    window: Option<usize>,
    conversation: Option<&str>,
) -> Result<()> {
    // Caller-side validation: the builder itself never sees empty input.
    if text.trim().is_empty() {
        bail!("reply text must not be empty");
    }

    // Missing credential is a precondition, checked before any work.
    let Some(api_key) = completion::api_key() else {
        bail!("{} environment variable not set", completion::API_KEY_ENV);
    };

    let window = window.unwrap_or(config.context.window);

    let pool = db::connect(config).await?;
    let history = store::list_recent(&pool, config.context.history_limit, conversation).await?;
    pool.close().await;

    let turns = context::build_context(&history, text, window);
    let reply = completion::request_reply(&config.completion, &api_key, turns).await?;

    println!("{}", reply);
    Ok(())
}
