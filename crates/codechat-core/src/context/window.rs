//! Bounded history window for prompt assembly.
//!
//! Stored history grows without bound; the prompt window does not. The
//! window keeps the most recent messages, capped both by count and by an
//! estimated token budget.

use codechat_types::chat::StoredMessage;
use codechat_types::config::PromptLimits;

/// Select the trailing slice of `history` that fits the limits.
///
/// First the most recent `max_history_messages` are taken; then messages are
/// dropped from the oldest end while the estimated token count exceeds
/// `max_history_tokens`. The newest message is always kept.
pub fn window<'a>(history: &'a [StoredMessage], limits: &PromptLimits) -> &'a [StoredMessage] {
    let start = history.len().saturating_sub(limits.max_history_messages);
    let mut slice = &history[start..];

    while slice.len() > 1 && estimate_tokens(slice) > limits.max_history_tokens {
        slice = &slice[1..];
    }

    slice
}

/// Rough token estimate for a run of messages.
///
/// Uses 1 token ~ 4 characters, counting message bodies only. Exact counting
/// would require a tokenizer; this only needs to bound prompt growth.
pub fn estimate_tokens(messages: &[StoredMessage]) -> u32 {
    let total_chars: usize = messages.iter().map(|m| m.body.len()).sum();
    (total_chars / 4) as u32
}
