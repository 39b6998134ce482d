//! Core data models used throughout mimic.
//!
//! These types represent the messages that flow through the import and
//! reply pipeline: parsed records on their way into SQLite, and role-mapped
//! chat turns on their way to the completion service.

use serde::{Deserialize, Serialize};

/// A single logical message extracted from a chat export.
///
/// Records are created once by the export parser and are immutable
/// afterwards. Within one parse pass they are ordered by arrival order in
/// the source text; the parser never re-sorts by `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    /// Display name as it appeared in the export.
    pub sender: String,
    /// Message body. Multi-line, trimmed of leading/trailing whitespace.
    pub content: String,
    /// Epoch milliseconds. Falls back to time-of-parsing when the export's
    /// date fragment is unrecognizable.
    pub timestamp: i64,
    /// Short tag identifying the source application (e.g. "whatsapp").
    pub platform: String,
    /// True when `sender` case-insensitively equals the configured owner name.
    pub is_from_owner: bool,
    /// Groups records into a logical thread. One import call shares one id.
    pub conversation_id: String,
}

/// Chat-format role for a completion-request turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A `{role, content}` pair submitted to the completion service.
///
/// Roles derive from [`MessageRecord::is_from_owner`]: owner messages map
/// to `assistant` (the owner is who the clone impersonates), everyone else
/// maps to `user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}
