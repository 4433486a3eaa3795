//! SQLite conversation repository implementation.
//!
//! Implements `ConversationRepository` from `codechat-core` using sqlx with
//! split read/write pools: raw queries, private Row structs, every value
//! bound as a parameter. All conversations share one messages table keyed by
//! `(conversation_id, id)`; no DDL ever runs per conversation.

use codechat_core::chat::repository::ConversationRepository;
use codechat_types::chat::{AttachmentRef, Conversation, NewMessage, Speaker, StoredMessage};
use codechat_types::config::TitlePolicy;
use codechat_types::error::StoreError;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ConversationRepository`.
pub struct SqliteConversationRepository {
    pool: DatabasePool,
    title_policy: TitlePolicy,
}

impl SqliteConversationRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool, title_policy: TitlePolicy) -> Self {
        Self { pool, title_policy }
    }

    async fn conversation_exists(&self, conversation_id: &Uuid) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT 1 FROM conversations WHERE id = ?")
            .bind(conversation_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx)?;
        Ok(row.is_some())
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

/// Internal row type for mapping SQLite rows to domain Conversation.
struct ConversationRow {
    id: String,
    title: String,
    created_at: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, StoreError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StoreError::Query(format!("invalid conversation id: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(Conversation {
            id,
            title: self.title,
            created_at,
        })
    }
}

/// Internal row type for mapping SQLite rows to domain StoredMessage.
struct MessageRow {
    id: i64,
    conversation_id: String,
    speaker: String,
    body: String,
    attachment_locator: Option<String>,
    attachment_name: Option<String>,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            conversation_id: row.try_get("conversation_id")?,
            speaker: row.try_get("speaker")?,
            body: row.try_get("body")?,
            attachment_locator: row.try_get("attachment_locator")?,
            attachment_name: row.try_get("attachment_name")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<StoredMessage, StoreError> {
        let conversation_id = Uuid::parse_str(&self.conversation_id)
            .map_err(|e| StoreError::Query(format!("invalid conversation_id: {e}")))?;
        let speaker: Speaker = self
            .speaker
            .parse()
            .map_err(|e: String| StoreError::Query(e))?;
        let created_at = parse_datetime(&self.created_at)?;
        let attachment = self.attachment_locator.map(|locator| AttachmentRef {
            locator,
            display_name: self.attachment_name,
        });

        Ok(StoredMessage {
            id: self.id,
            conversation_id,
            speaker,
            body: self.body,
            attachment,
            created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map sqlx failures onto the store taxonomy: pool/IO trouble is a
/// connection problem, everything else a query failure.
fn map_sqlx(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Connection
        }
        other => StoreError::Query(other.to_string()),
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

// ---------------------------------------------------------------------------
// ConversationRepository implementation
// ---------------------------------------------------------------------------

impl ConversationRepository for SqliteConversationRepository {
    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<Conversation, StoreError> {
        if self.title_policy == TitlePolicy::Unique {
            let taken = sqlx::query("SELECT 1 FROM conversations WHERE title = ?")
                .bind(&conversation.title)
                .fetch_optional(&self.pool.reader)
                .await
                .map_err(map_sqlx)?;
            if taken.is_some() {
                return Err(StoreError::DuplicateTitle(conversation.title.clone()));
            }
        }

        sqlx::query("INSERT INTO conversations (id, title, created_at) VALUES (?, ?, ?)")
            .bind(conversation.id.to_string())
            .bind(&conversation.title)
            .bind(format_datetime(&conversation.created_at))
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx)?;

        Ok(conversation.clone())
    }

    async fn get_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Option<Conversation>, StoreError> {
        let row = sqlx::query("SELECT * FROM conversations WHERE id = ?")
            .bind(conversation_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx)?;

        match row {
            Some(row) => {
                let conversation_row =
                    ConversationRow::from_row(&row).map_err(|e| StoreError::Query(e.to_string()))?;
                Ok(Some(conversation_row.into_conversation()?))
            }
            None => Ok(None),
        }
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>, StoreError> {
        let rows = sqlx::query("SELECT * FROM conversations ORDER BY created_at ASC, id ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_sqlx)?;

        let mut conversations = Vec::with_capacity(rows.len());
        for row in &rows {
            let conversation_row =
                ConversationRow::from_row(row).map_err(|e| StoreError::Query(e.to_string()))?;
            conversations.push(conversation_row.into_conversation()?);
        }

        Ok(conversations)
    }

    async fn rename_conversation(
        &self,
        conversation_id: &Uuid,
        title: &str,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE conversations SET title = ? WHERE id = ?")
            .bind(title)
            .bind(conversation_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn delete_conversation(&self, conversation_id: &Uuid) -> Result<(), StoreError> {
        // ON DELETE CASCADE removes the conversation's messages in the same
        // statement, so the delete is all-or-nothing.
        let result = sqlx::query("DELETE FROM conversations WHERE id = ?")
            .bind(conversation_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn append_message(
        &self,
        conversation_id: &Uuid,
        message: &NewMessage,
    ) -> Result<i64, StoreError> {
        if !self.conversation_exists(conversation_id).await? {
            return Err(StoreError::NotFound);
        }

        let (locator, name) = match &message.attachment {
            Some(attachment) => (
                Some(attachment.locator.clone()),
                attachment.display_name.clone(),
            ),
            None => (None, None),
        };

        // Committed before returning; the caller may rely on durability.
        let result = sqlx::query(
            r#"INSERT INTO messages (conversation_id, speaker, body, attachment_locator, attachment_name, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(conversation_id.to_string())
        .bind(message.speaker.to_string())
        .bind(&message.body)
        .bind(locator)
        .bind(name)
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx)?;

        Ok(result.last_insert_rowid())
    }

    async fn get_history(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Vec<StoredMessage>, StoreError> {
        let rows = sqlx::query("SELECT * FROM messages WHERE conversation_id = ? ORDER BY id ASC")
            .bind(conversation_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_sqlx)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let message_row =
                MessageRow::from_row(row).map_err(|e| StoreError::Query(e.to_string()))?;
            messages.push(message_row.into_message()?);
        }

        Ok(messages)
    }

    async fn delete_message(
        &self,
        conversation_id: &Uuid,
        message_id: i64,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM messages WHERE conversation_id = ? AND id = ?")
            .bind(conversation_id.to_string())
            .bind(message_id)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn count_messages(&self, conversation_id: &Uuid) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM messages WHERE conversation_id = ?")
            .bind(conversation_id.to_string())
            .fetch_one(&self.pool.reader)
            .await
            .map_err(map_sqlx)?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::DatabasePool;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::connect(&url, &codechat_types::config::DatabaseConfig::default())
            .await
            .unwrap()
    }

    async fn test_repo() -> SqliteConversationRepository {
        SqliteConversationRepository::new(test_pool().await, TitlePolicy::AllowDuplicates)
    }

    #[tokio::test]
    async fn test_create_and_get_conversation() {
        let repo = test_repo().await;

        let conversation = Conversation::new(Some("Sorting in Rust".to_string()));
        let created = repo.create_conversation(&conversation).await.unwrap();
        assert_eq!(created.id, conversation.id);

        let found = repo.get_conversation(&conversation.id).await.unwrap().unwrap();
        assert_eq!(found.id, conversation.id);
        assert_eq!(found.title, "Sorting in Rust");
    }

    #[tokio::test]
    async fn test_list_conversations_empty_then_ordered() {
        let repo = test_repo().await;
        assert!(repo.list_conversations().await.unwrap().is_empty());

        let first = Conversation::new(Some("first".to_string()));
        let second = Conversation::new(Some("second".to_string()));
        repo.create_conversation(&first).await.unwrap();
        repo.create_conversation(&second).await.unwrap();

        let listed = repo.list_conversations().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "first");
        assert_eq!(listed[1].title, "second");
    }

    #[tokio::test]
    async fn test_duplicate_title_policy() {
        let pool = test_pool().await;
        let unique_repo =
            SqliteConversationRepository::new(pool.clone(), TitlePolicy::Unique);

        let original = Conversation::new(Some("taken".to_string()));
        unique_repo.create_conversation(&original).await.unwrap();

        let duplicate = Conversation::new(Some("taken".to_string()));
        let result = unique_repo.create_conversation(&duplicate).await;
        assert!(matches!(result, Err(StoreError::DuplicateTitle(t)) if t == "taken"));

        // The relaxed policy accepts the same title on the same store
        let relaxed_repo =
            SqliteConversationRepository::new(pool, TitlePolicy::AllowDuplicates);
        let another = Conversation::new(Some("taken".to_string()));
        relaxed_repo.create_conversation(&another).await.unwrap();
    }

    #[tokio::test]
    async fn test_append_preserves_order_and_monotonic_ids() {
        let repo = test_repo().await;
        let conversation = Conversation::new(None);
        repo.create_conversation(&conversation).await.unwrap();

        let mut ids = Vec::new();
        for body in ["one", "two", "three", "four"] {
            let id = repo
                .append_message(&conversation.id, &NewMessage::user(body))
                .await
                .unwrap();
            ids.push(id);
        }
        assert!(ids.windows(2).all(|w| w[0] < w[1]));

        let history = repo.get_history(&conversation.id).await.unwrap();
        let bodies: Vec<&str> = history.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, ["one", "two", "three", "four"]);
    }

    #[tokio::test]
    async fn test_append_to_missing_conversation_fails() {
        let repo = test_repo().await;
        let result = repo
            .append_message(&Uuid::now_v7(), &NewMessage::user("hola"))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_attachment_roundtrips_through_store() {
        let repo = test_repo().await;
        let conversation = Conversation::new(None);
        repo.create_conversation(&conversation).await.unwrap();

        let message = NewMessage::user("see attached").with_attachment(AttachmentRef {
            locator: "0199cafe_notes.txt".to_string(),
            display_name: Some("notes.txt".to_string()),
        });
        repo.append_message(&conversation.id, &message).await.unwrap();

        let history = repo.get_history(&conversation.id).await.unwrap();
        let attachment = history[0].attachment.as_ref().unwrap();
        assert_eq!(attachment.locator, "0199cafe_notes.txt");
        assert_eq!(attachment.display_name.as_deref(), Some("notes.txt"));
    }

    #[tokio::test]
    async fn test_delete_conversation_cascades_messages() {
        let repo = test_repo().await;
        let conversation = Conversation::new(None);
        repo.create_conversation(&conversation).await.unwrap();
        repo.append_message(&conversation.id, &NewMessage::user("hola"))
            .await
            .unwrap();

        repo.delete_conversation(&conversation.id).await.unwrap();

        assert!(repo.get_conversation(&conversation.id).await.unwrap().is_none());
        assert_eq!(repo.count_messages(&conversation.id).await.unwrap(), 0);
        // Missing conversation reads as empty history, not an error
        assert!(repo.get_history(&conversation.id).await.unwrap().is_empty());
        assert!(repo
            .list_conversations()
            .await
            .unwrap()
            .iter()
            .all(|c| c.id != conversation.id));
    }

    #[tokio::test]
    async fn test_delete_message_leaves_sibling_ids_untouched() {
        let repo = test_repo().await;
        let conversation = Conversation::new(None);
        repo.create_conversation(&conversation).await.unwrap();

        let a = repo
            .append_message(&conversation.id, &NewMessage::user("a"))
            .await
            .unwrap();
        let b = repo
            .append_message(&conversation.id, &NewMessage::assistant("b"))
            .await
            .unwrap();
        let c = repo
            .append_message(&conversation.id, &NewMessage::user("c"))
            .await
            .unwrap();

        repo.delete_message(&conversation.id, b).await.unwrap();

        let history = repo.get_history(&conversation.id).await.unwrap();
        let ids: Vec<i64> = history.iter().map(|m| m.id).collect();
        assert_eq!(ids, [a, c]);

        let missing = repo.delete_message(&conversation.id, b).await;
        assert!(matches!(missing, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_rename_conversation() {
        let repo = test_repo().await;
        let conversation = Conversation::new(None);
        repo.create_conversation(&conversation).await.unwrap();

        repo.rename_conversation(&conversation.id, "Renamed").await.unwrap();
        let found = repo.get_conversation(&conversation.id).await.unwrap().unwrap();
        assert_eq!(found.title, "Renamed");

        let missing = repo.rename_conversation(&Uuid::now_v7(), "x").await;
        assert!(matches!(missing, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_speaker_is_persisted() {
        let repo = test_repo().await;
        let conversation = Conversation::new(None);
        repo.create_conversation(&conversation).await.unwrap();

        repo.append_message(&conversation.id, &NewMessage::user("q"))
            .await
            .unwrap();
        repo.append_message(&conversation.id, &NewMessage::assistant("a"))
            .await
            .unwrap();

        let history = repo.get_history(&conversation.id).await.unwrap();
        assert_eq!(history[0].speaker, Speaker::User);
        assert_eq!(history[1].speaker, Speaker::Assistant);
    }
}
