use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::context::{DEFAULT_CONTEXT_WINDOW, DEFAULT_HISTORY_LIMIT};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub owner: OwnerConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub context: ContextConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OwnerConfig {
    /// Display name the owner goes by in exports. Sender classification
    /// compares against this, trimmed and case-insensitively.
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CompletionConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}
fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}
fn default_temperature() -> f64 {
    0.7
}
fn default_max_tokens() -> u32 {
    500
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContextConfig {
    #[serde(default = "default_window")]
    pub window: usize,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            history_limit: default_history_limit(),
        }
    }
}

fn default_window() -> usize {
    DEFAULT_CONTEXT_WINDOW
}
fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.owner.name.trim().is_empty() {
        anyhow::bail!("owner.name must not be empty");
    }

    if config.completion.model.is_empty() {
        anyhow::bail!("completion.model must not be empty");
    }

    if config.completion.max_tokens == 0 {
        anyhow::bail!("completion.max_tokens must be > 0");
    }

    if !(0.0..=2.0).contains(&config.completion.temperature) {
        anyhow::bail!("completion.temperature must be in [0.0, 2.0]");
    }

    if config.context.history_limit < config.context.window {
        anyhow::bail!("context.history_limit must be >= context.window");
    }

    Ok(config)
}
