//! Chat-export parsing: line classification and record assembly.
//!
//! Exports from messaging apps are line-oriented: a **header line** opens a
//! new message (date fragment, sender, first content line) and any
//! following non-header lines are **continuations** of that message. The
//! parser makes a single pass over the text with an explicit two-state
//! machine (`Idle` until the first header, `Accumulating` while a message
//! is in progress), flushing the in-progress message whenever a new header
//! appears and once more at end of input.
//!
//! Malformed input never aborts a parse. Unresolvable timestamps fall back
//! to time-of-parsing, continuation lines with no open message are dropped,
//! and the worst case for an unrecognizable file is an empty result (the
//! caller treats that as "nothing importable").

use std::sync::LazyLock;

use regex::Regex;

use crate::models::MessageRecord;
use crate::timestamp;

/// System notice WhatsApp inserts at the top of every exported thread.
/// Any record containing it is noise, not conversation.
const ENCRYPTION_NOTICE: &str = "Messages and calls are end-to-end encrypted";

/// Placeholder the exporter substitutes for attachments.
const MEDIA_PLACEHOLDER: &str = "<Media omitted>";

// Header shapes, tried in order; the separator-dash shape wins when a line
// satisfies both. The substring checks in the noise filter are
// position-insensitive on purpose (see DESIGN.md).

/// `25/12/23, 10:30 PM - John: Hello`
static DASH_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d{1,2}/\d{1,2}/\d{2,4},?\s+\d{1,2}:\d{2}\s*(?:AM|PM|am|pm)?)\s*-\s*([^:]+):\s*(.+)",
    )
    .expect("valid regex")
});

/// `[25/12/23, 10:30:00] John: Hello`
static BRACKET_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\s*([^:]+):\s*(.+)").expect("valid regex"));

/// A line recognized as the start of a new message, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderParts {
    /// Raw date/time fragment, resolved later by [`timestamp::resolve_timestamp`].
    pub timestamp_fragment: String,
    /// Sender display name, trimmed.
    pub sender: String,
    /// Content up to end of line, trimmed.
    pub content: String,
    /// Whether `sender` matches the owner name (trimmed, case-insensitive).
    pub is_from_owner: bool,
}

/// Decide whether a raw line starts a new message and, if so, extract its
/// parts. Returns `None` for continuation lines.
pub fn classify_line(line: &str, owner_name: &str) -> Option<HeaderParts> {
    for pattern in [&*DASH_HEADER, &*BRACKET_HEADER] {
        if let Some(caps) = pattern.captures(line) {
            let sender = caps[2].trim().to_string();
            let is_from_owner = sender.to_lowercase() == owner_name.trim().to_lowercase();
            return Some(HeaderParts {
                timestamp_fragment: caps[1].trim().to_string(),
                sender,
                content: caps[3].trim().to_string(),
                is_from_owner,
            });
        }
    }
    None
}

/// Message being assembled while the scan looks for its last line.
struct Pending {
    sender: String,
    timestamp: i64,
    is_from_owner: bool,
    content: String,
}

impl Pending {
    fn into_record(self, platform: &str, conversation_id: &str) -> MessageRecord {
        MessageRecord {
            sender: self.sender,
            content: self.content.trim().to_string(),
            timestamp: self.timestamp,
            platform: platform.to_string(),
            is_from_owner: self.is_from_owner,
            conversation_id: conversation_id.to_string(),
        }
    }
}

/// Scanner state: at most one message is in progress at any point, so
/// memory stays bounded regardless of input size.
enum ScanState {
    Idle,
    Accumulating(Pending),
}

/// Parse one export's text into ordered message records.
///
/// Records come out in arrival order, which is assumed (not verified) to be
/// chronological. All records of one call share `conversation_id`. The
/// post-assembly filter drops records whose trimmed content is empty or
/// contains a known noise marker.
pub fn parse_export(
    raw_text: &str,
    owner_name: &str,
    platform: &str,
    conversation_id: &str,
) -> Vec<MessageRecord> {
    let mut records = Vec::new();
    let mut state = ScanState::Idle;

    for line in raw_text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        match classify_line(line, owner_name) {
            Some(header) => {
                if let ScanState::Accumulating(pending) =
                    std::mem::replace(&mut state, ScanState::Idle)
                {
                    records.push(pending.into_record(platform, conversation_id));
                }
                let ts = timestamp::resolve_timestamp(&header.timestamp_fragment)
                    .unwrap_or_else(timestamp::now_millis);
                state = ScanState::Accumulating(Pending {
                    sender: header.sender,
                    timestamp: ts,
                    is_from_owner: header.is_from_owner,
                    content: header.content,
                });
            }
            None => match &mut state {
                ScanState::Accumulating(pending) => {
                    pending.content.push('\n');
                    pending.content.push_str(line);
                }
                // Continuation before any header: nothing to attach it to.
                ScanState::Idle => {}
            },
        }
    }

    if let ScanState::Accumulating(pending) = state {
        records.push(pending.into_record(platform, conversation_id));
    }

    records.retain(|r| {
        !r.content.is_empty()
            && !r.content.contains(ENCRYPTION_NOTICE)
            && !r.content.contains(MEDIA_PLACEHOLDER)
    });

    records
}
