//! ConversationRepository trait definition.
//!
//! Durable CRUD over conversations and their message sequences. The store is
//! the single source of truth for chat history: the surrounding UI re-renders
//! from scratch on every interaction, so nothing in memory survives between
//! turns.

use codechat_types::chat::{Conversation, NewMessage, StoredMessage};
use codechat_types::error::StoreError;
use uuid::Uuid;

/// Repository trait for conversation and message persistence.
///
/// Implementations live in codechat-infra (e.g. `SqliteConversationRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
///
/// Every operation runs in its own transaction; no operation spans multiple
/// calls. `append_message` must commit durably before returning.
pub trait ConversationRepository: Send + Sync {
    /// Create a new conversation.
    ///
    /// Fails with `StoreError::DuplicateTitle` when the store enforces
    /// unique titles and the title is taken.
    fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> impl std::future::Future<Output = Result<Conversation, StoreError>> + Send;

    /// Get a conversation by its unique ID.
    fn get_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, StoreError>> + Send;

    /// List all conversations, oldest first. Empty when none exist.
    fn list_conversations(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Conversation>, StoreError>> + Send;

    /// Replace a conversation's title.
    fn rename_conversation(
        &self,
        conversation_id: &Uuid,
        title: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Delete a conversation and all of its messages atomically.
    fn delete_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Append a message to a conversation, returning its assigned id.
    ///
    /// Fails with `StoreError::NotFound` when the conversation does not
    /// exist. Ids are monotonically increasing; insertion order is the
    /// ordering key.
    fn append_message(
        &self,
        conversation_id: &Uuid,
        message: &NewMessage,
    ) -> impl std::future::Future<Output = Result<i64, StoreError>> + Send;

    /// Get a conversation's messages in ascending id order.
    ///
    /// A missing or empty conversation yields an empty vec, not an error:
    /// callers treat it as "no context" so the UI stays resilient to a
    /// conversation disappearing between renders.
    fn get_history(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<StoredMessage>, StoreError>> + Send;

    /// Delete exactly one message. Surviving messages keep their ids.
    fn delete_message(
        &self,
        conversation_id: &Uuid,
        message_id: i64,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Number of messages in a conversation (0 when it does not exist).
    fn count_messages(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;
}
