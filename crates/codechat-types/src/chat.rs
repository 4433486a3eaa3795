//! Conversation and message types for codechat.
//!
//! A `Conversation` is a named, ordered collection of messages and the unit
//! of listing and deletion. A `StoredMessage` is one persisted turn (user or
//! assistant) with an optional attachment reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Placeholder title given to a conversation before its first user message.
pub const PLACEHOLDER_TITLE: &str = "New chat";

/// Who produced a message.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (speaker IN ('user', 'assistant'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::User => write!(f, "user"),
            Speaker::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for Speaker {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Speaker::User),
            "assistant" => Ok(Speaker::Assistant),
            other => Err(format!("invalid speaker: '{other}'")),
        }
    }
}

/// A conversation between the user and the model.
///
/// The id is assigned at creation and never changes. The title starts as
/// [`PLACEHOLDER_TITLE`] and may be rewritten once, to a prefix of the first
/// user message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a conversation with a fresh time-sortable id.
    ///
    /// `title` of `None` yields the placeholder title.
    pub fn new(title: Option<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: title.unwrap_or_else(|| PLACEHOLDER_TITLE.to_string()),
            created_at: Utc::now(),
        }
    }

    /// Whether the title is still the untouched placeholder.
    pub fn has_placeholder_title(&self) -> bool {
        self.title == PLACEHOLDER_TITLE
    }
}

/// Reference to an externally stored attachment payload.
///
/// The bytes live in the blob store; messages carry only the locator and an
/// optional human-facing name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    /// Opaque locator understood by the blob store.
    pub locator: String,
    /// Display name shown in prompts and listings (e.g. the original filename).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl AttachmentRef {
    /// The name to show for this attachment: display name if set, else locator.
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.locator)
    }
}

/// A message as persisted in the store.
///
/// `id` is a monotonically increasing integer; within a conversation,
/// ascending id is the insertion order. Deleting a message never renumbers
/// the others.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: i64,
    pub conversation_id: Uuid,
    pub speaker: Speaker,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachmentRef>,
    pub created_at: DateTime<Utc>,
}

/// A message about to be appended; the store assigns id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub speaker: Speaker,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachmentRef>,
}

impl NewMessage {
    /// A plain user turn without attachment.
    pub fn user(body: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            body: body.into(),
            attachment: None,
        }
    }

    /// A plain assistant turn without attachment.
    pub fn assistant(body: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            body: body.into(),
            attachment: None,
        }
    }

    /// Attach a blob reference to this message.
    pub fn with_attachment(mut self, attachment: AttachmentRef) -> Self {
        self.attachment = Some(attachment);
        self
    }
}
