//! # mimic CLI
//!
//! The `mimic` binary is the interface to the import and reply pipeline.
//! It provides commands for database initialization, chat-export import,
//! stored-message inspection, and style-mimicry reply generation.
//!
//! ## Usage
//!
//! ```bash
//! mimic --config ./config/mimic.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `mimic init` | Create the SQLite database and run schema migrations |
//! | `mimic import <file>` | Parse a chat export and store its messages |
//! | `mimic list` | Print stored messages |
//! | `mimic stats` | Counts and per-platform breakdown |
//! | `mimic reply "<text>"` | Generate a reply in the owner's style |
//! | `mimic clear` | Delete stored messages |
//!
//! ## Examples
//!
//! ```bash
//! # Initialize the database
//! mimic init --config ./config/mimic.toml
//!
//! # Import a WhatsApp export, checking the parse first
//! mimic import chat.txt --platform whatsapp --dry-run
//! mimic import chat.txt --platform whatsapp
//!
//! # Generate a reply using the last ten stored messages as context
//! OPENAI_API_KEY=sk-... mimic reply "are we still on for tonight?"
//! ```

mod clear;
mod completion;
mod config;
mod context;
mod db;
mod error;
mod import;
mod list;
mod migrate;
mod models;
mod parser;
mod reply;
mod stats;
mod store;
mod timestamp;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// mimic, the chat-export ingestion and style-mimicry reply engine.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file carrying the database path, the owner name, and the completion
/// settings.
#[derive(Parser)]
#[command(
    name = "mimic",
    about = "mimic — chat-export ingestion and style-mimicry reply engine",
    version,
    long_about = "mimic parses messaging-app chat exports into ordered message records, \
    stores them in SQLite, and builds bounded, style-mimicking prompts for an \
    OpenAI-compatible completion service."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/mimic.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the messages table. This
    /// command is idempotent; running it multiple times is safe.
    Init,

    /// Parse a chat export file and store its messages.
    ///
    /// Reads a UTF-8, line-oriented export, assembles message records
    /// (merging continuation lines, resolving timestamps, classifying the
    /// owner's messages), filters noise, and batch-inserts the result.
    /// Fails with a nonzero exit when nothing importable is found.
    Import {
        /// Path to the export text file.
        file: PathBuf,

        /// Source application tag stored with every record (e.g. `whatsapp`).
        #[arg(long, default_value = "whatsapp")]
        platform: String,

        /// Conversation id shared by all records of this import.
        /// Defaults to `<platform>_main`.
        #[arg(long)]
        conversation: Option<String>,

        /// Parse and report counts without writing to the database.
        #[arg(long)]
        dry_run: bool,
    },

    /// Print stored messages.
    ///
    /// Newest first by default; `--conversation` prints one thread in
    /// chronological order instead.
    List {
        /// Only this platform's messages.
        #[arg(long)]
        platform: Option<String>,

        /// Only this conversation's messages, oldest first.
        #[arg(long, conflicts_with = "platform")]
        conversation: Option<String>,

        /// Maximum number of messages to print.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show message counts and a per-platform breakdown.
    Stats,

    /// Generate a reply to a message in the owner's style.
    ///
    /// Builds a completion request from the synthesized style instruction,
    /// a bounded window of stored history, and the given message, then
    /// prints the generated reply. Requires the OPENAI_API_KEY environment
    /// variable.
    Reply {
        /// The incoming message to reply to.
        message: String,

        /// Override the configured number of history turns included.
        #[arg(long)]
        window: Option<usize>,

        /// Draw context from one conversation instead of the whole store.
        #[arg(long)]
        conversation: Option<String>,
    },

    /// Delete stored messages.
    Clear {
        /// Only delete this platform's messages.
        #[arg(long)]
        platform: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Import {
            file,
            platform,
            conversation,
            dry_run,
        } => {
            import::run_import(&cfg, &file, &platform, conversation, dry_run).await?;
        }
        Commands::List {
            platform,
            conversation,
            limit,
        } => {
            list::run_list(&cfg, platform.as_deref(), conversation.as_deref(), limit).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
        Commands::Reply {
            message,
            window,
            conversation,
        } => {
            reply::run_reply(&cfg, &message, window, conversation.as_deref()).await?;
        }
        Commands::Clear { platform } => {
            clear::run_clear(&cfg, platform.as_deref()).await?;
        }
    }

    Ok(())
}
