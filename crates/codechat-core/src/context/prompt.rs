//! Flat prompt rendering.
//!
//! The model consumes a fixed textual protocol: one `"{speaker}: {body}"`
//! line per historical message, the new turn under the literal `Usuario:`
//! label, then the custom instructions verbatim. The label set is stable and
//! asserted by tests; downstream parsing depends on it.

use codechat_types::chat::StoredMessage;
use codechat_types::config::PromptLimits;

use super::window::window;

/// Label for the new user turn, kept from the original wire format.
const NEW_TURN_LABEL: &str = "Usuario";

/// Render the prompt for one turn.
///
/// History is windowed per `limits` (most recent messages first dropped by
/// count, then by estimated token budget) and rendered oldest-first. A
/// message carrying an attachment gets a one-line `[adjunto: name]` marker
/// after its body; attachment content is never inlined here -- the caller
/// inlines extracted text into `new_input` when an extractor succeeded.
pub fn build_prompt(
    history: &[StoredMessage],
    new_input: &str,
    custom_instructions: Option<&str>,
    limits: &PromptLimits,
) -> String {
    let mut prompt = String::new();

    for message in window(history, limits) {
        prompt.push_str(&format!("{}: {}\n", message.speaker, message.body));
        if let Some(attachment) = &message.attachment {
            prompt.push_str(&format!("[adjunto: {}]\n", attachment.name()));
        }
    }

    prompt.push_str(&format!("{NEW_TURN_LABEL}: {new_input}\n"));

    if let Some(instructions) = custom_instructions {
        prompt.push_str(instructions);
        prompt.push('\n');
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use codechat_types::chat::{AttachmentRef, Speaker};
    use uuid::Uuid;

    fn msg(id: i64, speaker: Speaker, body: &str) -> StoredMessage {
        StoredMessage {
            id,
            conversation_id: Uuid::now_v7(),
            speaker,
            body: body.to_string(),
            attachment: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_history() {
        let prompt = build_prompt(&[], "hello", None, &PromptLimits::default());
        assert_eq!(prompt, "Usuario: hello\n");
    }

    #[test]
    fn test_history_and_instructions() {
        let history = vec![
            msg(1, Speaker::User, "hi"),
            msg(2, Speaker::Assistant, "hello"),
        ];
        let prompt = build_prompt(&history, "bye", Some("be terse"), &PromptLimits::default());
        assert_eq!(prompt, "user: hi\nassistant: hello\nUsuario: bye\nbe terse\n");
    }

    #[test]
    fn test_attachment_marker_uses_display_name() {
        let mut with_attachment = msg(1, Speaker::User, "see attached");
        with_attachment.attachment = Some(AttachmentRef {
            locator: "0199deadbeef_notes.txt".to_string(),
            display_name: Some("notes.txt".to_string()),
        });
        let prompt = build_prompt(
            &[with_attachment],
            "summarize it",
            None,
            &PromptLimits::default(),
        );
        assert_eq!(
            prompt,
            "user: see attached\n[adjunto: notes.txt]\nUsuario: summarize it\n"
        );
    }

    #[test]
    fn test_history_is_windowed() {
        let history: Vec<_> = (1..=6)
            .map(|i| msg(i, Speaker::User, &format!("m{i}")))
            .collect();
        let limits = PromptLimits {
            max_history_messages: 2,
            max_history_tokens: 6_000,
        };
        let prompt = build_prompt(&history, "next", None, &limits);
        assert_eq!(prompt, "user: m5\nuser: m6\nUsuario: next\n");
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let history = vec![
            msg(1, Speaker::User, "hi"),
            msg(2, Speaker::Assistant, "hello"),
        ];
        let a = build_prompt(&history, "bye", Some("be terse"), &PromptLimits::default());
        let b = build_prompt(&history, "bye", Some("be terse"), &PromptLimits::default());
        assert_eq!(a, b);
    }
}
