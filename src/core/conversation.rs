//! # Conversations
//!
//! The data a conversation carries: its messages, its purpose, and its titles.
//!
//! ```text
//! Conversation
//! ├── id: ConversationId            // uuid v4
//! ├── messages: Vec<Message>        // ordered, oldest first
//! ├── system_purpose_id: String     // key into the purpose table
//! ├── user_title: String            // set by rename, may be empty
//! ├── auto_title: String            // derived from the first user message
//! ├── created_at / updated_at: i64  // unix seconds
//! └── generation: Option<AbortHandle>  // present while the assistant types
//! ```
//!
//! The generation handle is runtime-only and never persisted.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::task::AbortHandle;

use crate::core::purpose::DEFAULT_PURPOSE_ID;

/// Title shown when neither a user title nor an auto title exists.
pub const FALLBACK_TITLE: &str = "new conversation";

/// Longest auto title before it gets cut with "...".
const AUTO_TITLE_MAX_LEN: usize = 60;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Generate a new UUID v4 conversation ID.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConversationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub created_at: i64,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            text: text.into(),
            created_at: Utc::now().timestamp(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Conversation {
    pub id: ConversationId,
    pub messages: Vec<Message>,
    pub system_purpose_id: String,
    #[serde(default)]
    pub user_title: String,
    #[serde(default)]
    pub auto_title: String,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip)]
    pub generation: Option<AbortHandle>,
}

impl Conversation {
    pub fn new(system_purpose_id: &str) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: ConversationId::generate(),
            messages: Vec::new(),
            system_purpose_id: system_purpose_id.to_string(),
            user_title: String::new(),
            auto_title: String::new(),
            created_at: now,
            updated_at: now,
            generation: None,
        }
    }

    pub fn is_generating(&self) -> bool {
        self.generation.is_some()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(DEFAULT_PURPOSE_ID)
    }
}

/// Resolve the title to display: user title, then auto title, then `fallback`.
pub fn conversation_title(conversation: &Conversation, fallback: &str) -> String {
    if !conversation.user_title.is_empty() {
        conversation.user_title.clone()
    } else if !conversation.auto_title.is_empty() {
        conversation.auto_title.clone()
    } else {
        fallback.to_string()
    }
}

/// Derive an auto title from a user message: first line, cut to 60 chars.
pub fn derive_title(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    if first_line.chars().count() > AUTO_TITLE_MAX_LEN {
        let cut: String = first_line.chars().take(AUTO_TITLE_MAX_LEN - 3).collect();
        return format!("{cut}...");
    }
    first_line.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_prefers_user_title() {
        let mut conversation = Conversation::default();
        conversation.auto_title = "Auto".to_string();
        conversation.user_title = "Mine".to_string();
        assert_eq!(conversation_title(&conversation, FALLBACK_TITLE), "Mine");
    }

    #[test]
    fn test_title_falls_back_to_auto_then_default() {
        let mut conversation = Conversation::default();
        assert_eq!(conversation_title(&conversation, FALLBACK_TITLE), "new conversation");

        conversation.auto_title = "Auto".to_string();
        assert_eq!(conversation_title(&conversation, FALLBACK_TITLE), "Auto");
    }

    #[test]
    fn test_empty_user_title_is_ignored() {
        let mut conversation = Conversation::default();
        conversation.auto_title = "Auto".to_string();
        conversation.user_title = String::new();
        assert_eq!(conversation_title(&conversation, FALLBACK_TITLE), "Auto");
    }

    #[test]
    fn test_derive_title_uses_first_line() {
        assert_eq!(derive_title("First line\nSecond line"), "First line");
    }

    #[test]
    fn test_derive_title_truncates_long_messages() {
        let long = "é".repeat(80);
        let title = derive_title(&long);
        assert_eq!(title.chars().count(), 60);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn test_generation_is_not_serialized() {
        let conversation = Conversation::default();
        let json = serde_json::to_string(&conversation).unwrap();
        assert!(!json.contains("generation"));
        let back: Conversation = serde_json::from_str(&json).unwrap();
        assert!(!back.is_generating());
        assert_eq!(back.id, conversation.id);
    }
}
