//! Conversation service orchestrating the chat turn lifecycle.
//!
//! `ConversationService` coordinates the repository, the prompt assembler,
//! and the text generator for the full turn: fetch history, build the
//! prompt, persist the user turn, call the model, persist the assistant
//! turn. A failed model call becomes a fallback assistant message -- the
//! interaction never crashes.

use codechat_types::chat::{AttachmentRef, Conversation, NewMessage, StoredMessage};
use codechat_types::config::PromptLimits;
use codechat_types::error::StoreError;
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::repository::ConversationRepository;
use crate::context::classify::{GeneratedContent, classify_response};
use crate::context::prompt::build_prompt;
use crate::llm::generator::TextGenerator;
use crate::storage::blob_store::BlobStore;

/// Assistant body substituted when generation fails or comes back empty.
pub const FALLBACK_REPLY: &str = "No se pudo generar una respuesta.";

/// Longest title derived from the first user message, in characters.
const TITLE_PREFIX_CHARS: usize = 48;

/// One user turn handed to [`ConversationService::run_turn`].
#[derive(Debug, Clone)]
pub struct TurnInput {
    /// The raw user text, persisted as the message body.
    pub text: String,
    /// Stored attachment reference, if the user attached a file.
    pub attachment: Option<AttachmentRef>,
    /// Extracted attachment text, when a content extractor succeeded.
    /// Inlined into the prompt but never into the stored body.
    pub attachment_text: Option<String>,
}

impl TurnInput {
    /// A plain text turn.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachment: None,
            attachment_text: None,
        }
    }
}

/// The persisted outcome of one turn.
#[derive(Debug, Clone)]
pub struct TurnReply {
    /// Id of the stored assistant message.
    pub message_id: i64,
    /// Full assistant body as persisted.
    pub body: String,
    /// Fence-sniffed classification of the body.
    pub content: GeneratedContent,
}

/// Orchestrates conversation lifecycle and message persistence.
///
/// Generic over `ConversationRepository` to keep the layering clean
/// (codechat-core never depends on codechat-infra).
pub struct ConversationService<R: ConversationRepository> {
    repo: R,
}

impl<R: ConversationRepository> ConversationService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Access the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    // --- Conversation lifecycle ---

    /// Create a conversation; `None` title yields the placeholder.
    pub async fn create_conversation(
        &self,
        title: Option<String>,
    ) -> Result<Conversation, StoreError> {
        let conversation = Conversation::new(title);
        let created = self.repo.create_conversation(&conversation).await?;
        info!(conversation_id = %created.id, "Conversation created");
        Ok(created)
    }

    pub async fn get_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Option<Conversation>, StoreError> {
        self.repo.get_conversation(conversation_id).await
    }

    pub async fn list_conversations(&self) -> Result<Vec<Conversation>, StoreError> {
        self.repo.list_conversations().await
    }

    /// Rename a conversation.
    pub async fn rename_conversation(
        &self,
        conversation_id: &Uuid,
        title: &str,
    ) -> Result<(), StoreError> {
        self.repo.rename_conversation(conversation_id, title).await?;
        info!(conversation_id = %conversation_id, title = %title, "Conversation renamed");
        Ok(())
    }

    /// Delete a conversation and all of its messages.
    pub async fn delete_conversation(&self, conversation_id: &Uuid) -> Result<(), StoreError> {
        self.repo.delete_conversation(conversation_id).await?;
        info!(conversation_id = %conversation_id, "Conversation deleted");
        Ok(())
    }

    /// Delete a conversation along with its attachment payloads.
    ///
    /// Message rows go first (they are the source of truth); blob removal is
    /// best effort, since a leftover file is recoverable while a dangling
    /// locator is not. A blob failure is logged, never propagated.
    pub async fn delete_conversation_with_attachments<B: BlobStore>(
        &self,
        blob_store: &B,
        conversation_id: &Uuid,
    ) -> Result<(), StoreError> {
        let history = self.repo.get_history(conversation_id).await?;
        self.delete_conversation(conversation_id).await?;

        for message in &history {
            if let Some(attachment) = &message.attachment
                && let Err(e) = blob_store.delete(&attachment.locator).await
            {
                warn!(locator = %attachment.locator, error = %e, "Attachment blob not removed");
            }
        }

        Ok(())
    }

    // --- Message persistence ---

    /// Get a conversation's messages in insertion order.
    pub async fn get_history(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Vec<StoredMessage>, StoreError> {
        self.repo.get_history(conversation_id).await
    }

    /// Delete exactly one message; remaining ids are untouched.
    pub async fn delete_message(
        &self,
        conversation_id: &Uuid,
        message_id: i64,
    ) -> Result<(), StoreError> {
        self.repo.delete_message(conversation_id, message_id).await
    }

    /// Append a user message, deriving the conversation title from the
    /// first real message when the title is still the placeholder.
    pub async fn append_user_message(
        &self,
        conversation_id: &Uuid,
        body: String,
        attachment: Option<AttachmentRef>,
    ) -> Result<i64, StoreError> {
        let existing = self.repo.count_messages(conversation_id).await?;

        let mut message = NewMessage::user(body);
        if let Some(attachment) = attachment {
            message = message.with_attachment(attachment);
        }
        let message_id = self.repo.append_message(conversation_id, &message).await?;

        if existing == 0
            && let Some(conversation) = self.repo.get_conversation(conversation_id).await?
            && conversation.has_placeholder_title()
            && let Some(title) = derive_title(&message.body)
        {
            self.repo.rename_conversation(conversation_id, &title).await?;
            info!(conversation_id = %conversation_id, title = %title, "Title derived from first message");
        }

        Ok(message_id)
    }

    /// Append an assistant message.
    pub async fn append_assistant_message(
        &self,
        conversation_id: &Uuid,
        body: String,
    ) -> Result<i64, StoreError> {
        self.repo
            .append_message(conversation_id, &NewMessage::assistant(body))
            .await
    }

    // --- Turn orchestration ---

    /// Run one full turn against `generator`.
    ///
    /// History is fetched before the new turn is appended, so the prompt
    /// contains each message exactly once. The user message is persisted
    /// before the model call; a generation failure still produces (and
    /// persists) a fallback assistant message.
    pub async fn run_turn<G: TextGenerator>(
        &self,
        generator: &G,
        conversation_id: &Uuid,
        input: TurnInput,
        custom_instructions: Option<&str>,
        limits: &PromptLimits,
    ) -> Result<TurnReply, StoreError> {
        let history = self.repo.get_history(conversation_id).await?;
        let prompt = build_prompt(&history, &effective_input(&input), custom_instructions, limits);

        self.append_user_message(conversation_id, input.text, input.attachment)
            .await?;

        let body = match generator.generate(&prompt).await {
            Ok(text) if text.trim().is_empty() => {
                warn!(conversation_id = %conversation_id, "Model returned empty text");
                FALLBACK_REPLY.to_string()
            }
            Ok(text) => text,
            Err(e) => {
                warn!(conversation_id = %conversation_id, error = %e, "Generation failed");
                FALLBACK_REPLY.to_string()
            }
        };

        let message_id = self
            .append_assistant_message(conversation_id, body.clone())
            .await?;
        let content = classify_response(&body);

        Ok(TurnReply {
            message_id,
            body,
            content,
        })
    }
}

/// What the model sees for the new turn.
///
/// The stored body comes first; an attachment adds its marker line, and
/// extracted content (when available) follows the marker.
fn effective_input(input: &TurnInput) -> String {
    match (&input.attachment, &input.attachment_text) {
        (Some(attachment), Some(text)) => {
            format!("{}\n[adjunto: {}]\n{}", input.text, attachment.name(), text)
        }
        (Some(attachment), None) => {
            format!("{}\n[adjunto: {}]", input.text, attachment.name())
        }
        (None, _) => input.text.clone(),
    }
}

/// Derive a conversation title from the first user message.
///
/// Takes a prefix of at most [`TITLE_PREFIX_CHARS`] characters, split on a
/// char boundary. Whitespace-only messages yield no title.
fn derive_title(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let title: String = trimmed.chars().take(TITLE_PREFIX_CHARS).collect();
    Some(title.trim_end().to_string())
}
