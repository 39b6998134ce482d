//! Conversation-context construction for completion requests.
//!
//! Builds the ordered turn list submitted to the completion service:
//! one synthesized system turn, a bounded window of historical turns, and
//! the new input as the final user turn. The system turn is derived from
//! the owner's own messages when any exist, so the model has concrete
//! exemplars of the style it is asked to copy.
//!
//! Everything here is pure and allocation-bounded: O(window + exemplars)
//! regardless of total history size.

use crate::models::{ChatTurn, MessageRecord, Role};

/// How many historical records a completion request carries by default.
/// Small enough to keep prompts cheap, large enough for local coherence.
pub const DEFAULT_CONTEXT_WINDOW: usize = 10;

/// Upper bound on owner-authored exemplars embedded in the system turn.
/// Twenty short messages are plenty to establish tone without letting a
/// large import crowd out the conversation itself.
pub const STYLE_EXEMPLAR_CAP: usize = 20;

/// Default bound on how much stored history a reply loads. Keeps the
/// context feed independent of total store size.
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// Build the ordered message list for one completion request.
///
/// Output is exactly `[system turn] ++ window turns ++ [new-input turn]`;
/// the completion service's chat-format contract depends on this ordering,
/// so it is never permuted. The window turns are the last `window` records
/// of `history` in their original order, each mapped through the
/// `is_from_owner → assistant` rule. A `window` of 0 yields only the system
/// and new-input turns; a `window` larger than `history` takes everything.
///
/// Validating `new_input` (it must be non-empty) is the caller's job,
/// before this function is invoked.
pub fn build_context(history: &[MessageRecord], new_input: &str, window: usize) -> Vec<ChatTurn> {
    let mut turns = Vec::with_capacity(window.min(history.len()) + 2);

    turns.push(ChatTurn::new(Role::System, synthesize_system_prompt(history)));

    let start = history.len().saturating_sub(window);
    for record in &history[start..] {
        let role = if record.is_from_owner {
            Role::Assistant
        } else {
            Role::User
        };
        turns.push(ChatTurn::new(role, record.content.clone()));
    }

    turns.push(ChatTurn::new(Role::User, new_input));
    turns
}

/// Synthesize the system instruction from the owner's historical messages.
///
/// With no owner-authored record in `history`, the instruction is generic.
/// Otherwise it embeds the first owner messages by history order (up to
/// [`STYLE_EXEMPLAR_CAP`]) as bulleted exemplars and instructs the
/// model to copy the owner's tone, vocabulary, and typical phrasing.
pub fn synthesize_system_prompt(history: &[MessageRecord]) -> String {
    let exemplars: Vec<&str> = history
        .iter()
        .filter(|r| r.is_from_owner)
        .take(STYLE_EXEMPLAR_CAP)
        .map(|r| r.content.as_str())
        .collect();

    if exemplars.is_empty() {
        return "You are an AI assistant trained to respond like the user. \
                Be helpful, friendly, and match the user's communication style. \
                Keep responses concise and natural."
            .to_string();
    }

    let mut prompt = String::from(
        "You are a clone of the user, trained to respond exactly as they would \
         based on their chat history. Copy their tone, vocabulary, and typical \
         phrasing. Match their personality, humor, and way of expressing thoughts. \
         Keep responses authentic and natural, as if the user themselves were \
         replying.\n\
         Here are examples of how the user typically communicates:",
    );
    for exemplar in exemplars {
        prompt.push_str("\n- ");
        prompt.push_str(exemplar);
    }
    prompt
}
