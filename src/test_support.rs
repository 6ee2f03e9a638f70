//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use ratatui::buffer::Buffer;

use crate::core::chats::ChatState;
use crate::core::conversation::{ConversationId, Message, Role};
use crate::core::purpose::DEFAULT_PURPOSE_ID;
use crate::core::store::Store;
use crate::tui::components::conversation_item::ConversationRenamer;

/// A renamer that records every call instead of touching a store.
#[derive(Default)]
pub struct RecordingRenamer {
    pub calls: Vec<(ConversationId, String)>,
}

impl ConversationRenamer for RecordingRenamer {
    fn set_user_title(&mut self, conversation_id: &ConversationId, title: &str) {
        self.calls.push((conversation_id.clone(), title.to_string()));
    }
}

/// Creates a store with `n` conversations, each holding one user message
/// titled "Topic <i>". Returns the ids top to bottom; the first is active.
pub fn test_store(n: usize) -> (Store<ChatState>, Vec<ConversationId>) {
    let mut state = ChatState::new();
    for _ in 1..n {
        state.create_conversation(DEFAULT_PURPOSE_ID);
    }
    let ids: Vec<ConversationId> = state.conversations().iter().map(|c| c.id.clone()).collect();
    for (i, id) in ids.iter().enumerate() {
        state.append_message(id, Message::new(Role::User, format!("Topic {i}")));
    }
    state.set_active(&ids[0]);
    (Store::new(state), ids)
}

/// Flatten a rendered buffer into one string, row after row.
pub fn buffer_text(buffer: &Buffer) -> String {
    buffer.content().iter().map(|c| c.symbol()).collect()
}
