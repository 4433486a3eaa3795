//! Explicit UI session state.
//!
//! The UI layer re-runs from the top on every interaction, so its state is a
//! plain struct handed into and out of each cycle -- never ambient globals.

use uuid::Uuid;

/// State threaded through the request/response cycle of the front end.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// The conversation the user is currently working in, if any.
    pub active_conversation: Option<Uuid>,
    /// Set when the user asked for a new conversation but no message has
    /// been sent yet (creation is lazy, on first message).
    pending_new_chat: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a conversation, clearing any pending new-chat request.
    pub fn select(&mut self, conversation_id: Uuid) {
        self.active_conversation = Some(conversation_id);
        self.pending_new_chat = false;
    }

    /// Deselect the active conversation (e.g. after it was deleted).
    pub fn clear(&mut self) {
        self.active_conversation = None;
    }

    /// Record that the next message should start a fresh conversation.
    pub fn request_new_chat(&mut self) {
        self.active_conversation = None;
        self.pending_new_chat = true;
    }

    /// Consume the pending new-chat flag.
    pub fn take_pending_new_chat(&mut self) -> bool {
        std::mem::take(&mut self.pending_new_chat)
    }
}
