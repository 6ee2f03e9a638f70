//! # Conversation Store
//!
//! All conversations and which one is active. This is the state behind the
//! sidebar, the transcript, and the responder.
//!
//! ```text
//! ChatState
//! ├── conversations: Vec<Conversation>   // newest first
//! └── active_id: ConversationId          // always points at an existing entry
//! ```
//!
//! Invariants: there is always at least one conversation, and `active_id`
//! always names one of them. Deleting the last conversation replaces it with a
//! fresh empty one.

use log::{debug, info, warn};
use tokio::task::AbortHandle;

use crate::core::conversation::{Conversation, ConversationId, Message, Role, derive_title};
use crate::core::purpose::DEFAULT_PURPOSE_ID;

#[derive(Debug)]
pub struct ChatState {
    conversations: Vec<Conversation>,
    active_id: ConversationId,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatState {
    /// One empty conversation, active.
    pub fn new() -> Self {
        let conversation = Conversation::new(DEFAULT_PURPOSE_ID);
        let active_id = conversation.id.clone();
        Self {
            conversations: vec![conversation],
            active_id,
        }
    }

    /// Rebuild from persisted conversations. Falls back to `new()` when the
    /// list is empty and to the first entry when `active_id` is stale.
    pub fn from_parts(conversations: Vec<Conversation>, active_id: Option<ConversationId>) -> Self {
        let Some(first) = conversations.first() else {
            return Self::new();
        };
        let active_id = active_id
            .filter(|id| conversations.iter().any(|c| &c.id == id))
            .unwrap_or_else(|| first.id.clone());
        Self {
            conversations,
            active_id,
        }
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    pub fn active_id(&self) -> &ConversationId {
        &self.active_id
    }

    pub fn active(&self) -> Option<&Conversation> {
        self.conversation(&self.active_id)
    }

    pub fn conversation(&self, id: &ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| &c.id == id)
    }

    fn conversation_mut(&mut self, id: &ConversationId) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| &c.id == id)
    }

    /// Create a conversation at the top of the list and make it active.
    pub fn create_conversation(&mut self, system_purpose_id: &str) -> ConversationId {
        let conversation = Conversation::new(system_purpose_id);
        let id = conversation.id.clone();
        self.conversations.insert(0, conversation);
        self.active_id = id.clone();
        info!("Created conversation {}", id);
        id
    }

    /// Returns false if `id` is not in the store.
    pub fn set_active(&mut self, id: &ConversationId) -> bool {
        if self.conversation(id).is_none() {
            warn!("Cannot activate unknown conversation {}", id);
            return false;
        }
        self.active_id = id.clone();
        true
    }

    /// Store the user title exactly as given. An empty title falls back to the
    /// auto title when resolved.
    pub fn set_user_title(&mut self, id: &ConversationId, title: &str) {
        if let Some(conversation) = self.conversation_mut(id) {
            conversation.user_title = title.to_string();
            debug!("Renamed conversation {} to {:?}", id, title);
        }
    }

    /// Delete a conversation, aborting any reply still streaming into it.
    ///
    /// If it was active, the conversation below it (or above, if it was last)
    /// becomes active. Returns the active id after deletion, or None if `id`
    /// was unknown.
    pub fn delete_conversation(&mut self, id: &ConversationId) -> Option<ConversationId> {
        let index = self.conversations.iter().position(|c| &c.id == id)?;
        let removed = self.conversations.remove(index);
        if let Some(handle) = removed.generation {
            handle.abort();
        }
        info!("Deleted conversation {}", id);

        if self.conversations.is_empty() {
            let replacement = Conversation::new(&removed.system_purpose_id);
            self.active_id = replacement.id.clone();
            self.conversations.push(replacement);
        } else if &self.active_id == id {
            let next = index.min(self.conversations.len() - 1);
            self.active_id = self.conversations[next].id.clone();
        }
        Some(self.active_id.clone())
    }

    /// Append a message. The first user message also sets the auto title.
    pub fn append_message(&mut self, id: &ConversationId, message: Message) {
        let Some(conversation) = self.conversation_mut(id) else {
            warn!("Dropping message for unknown conversation {}", id);
            return;
        };
        if message.role == Role::User && conversation.auto_title.is_empty() {
            conversation.auto_title = derive_title(&message.text);
        }
        conversation.updated_at = message.created_at;
        conversation.messages.push(message);
    }

    /// Stream text into the trailing assistant message, starting one if the
    /// conversation doesn't end with an assistant message.
    pub fn append_assistant_text(&mut self, id: &ConversationId, text: &str) {
        let Some(conversation) = self.conversation_mut(id) else {
            return;
        };
        match conversation.messages.last_mut() {
            Some(last) if last.role == Role::Assistant => last.text.push_str(text),
            _ => conversation.messages.push(Message::new(Role::Assistant, text)),
        }
    }

    /// Record (or clear) the handle of the task generating a reply.
    pub fn set_generation(&mut self, id: &ConversationId, handle: Option<AbortHandle>) {
        if let Some(conversation) = self.conversation_mut(id) {
            conversation.generation = handle;
        }
    }

    /// Abort the reply being generated for `id`. Returns true if one was running.
    pub fn stop_generation(&mut self, id: &ConversationId) -> bool {
        let Some(handle) = self
            .conversation_mut(id)
            .and_then(|c| c.generation.take())
        else {
            return false;
        };
        handle.abort();
        info!("Stopped generation for conversation {}", id);
        true
    }

    pub fn is_generating(&self, id: &ConversationId) -> bool {
        self.conversation(id).is_some_and(Conversation::is_generating)
    }
}
