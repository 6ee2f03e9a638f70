//! # Actions
//!
//! Everything that changes the conversation store goes through an `Action`.
//! User submits a prompt? That's `Action::Submit(text)`.
//! The responder streams a word? That's `Action::ReplyChunk { .. }`.
//!
//! `update()` applies the action and returns an `Effect` telling the event
//! loop what I/O to do next. No I/O happens here.
//!
//! ```text
//! ChatState + Action  →  update()  →  Effect
//! ```

use log::{debug, info};

use crate::core::chats::ChatState;
use crate::core::conversation::{ConversationId, Message, Role};
use crate::core::purpose::DEFAULT_PURPOSE_ID;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Submit(String),
    ReplyChunk {
        conversation_id: ConversationId,
        text: String,
    },
    ReplyDone {
        conversation_id: ConversationId,
    },
    CancelGeneration,
    NewConversation,
    Activate(ConversationId),
    Delete(ConversationId),
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Start the responder for this conversation.
    SpawnReply(ConversationId),
    SaveConversations,
    Quit,
}

pub fn update(state: &mut ChatState, action: Action) -> Effect {
    match action {
        Action::Submit(text) => {
            let id = state.active_id().clone();
            if state.is_generating(&id) {
                debug!("Ignoring submit while {} is generating", id);
                return Effect::None;
            }
            state.append_message(&id, Message::new(Role::User, text));
            Effect::SpawnReply(id)
        }
        Action::ReplyChunk {
            conversation_id,
            text,
        } => {
            // Words already queued by a cancelled reply
            if !state.is_generating(&conversation_id) {
                debug!("Dropping stale reply chunk for {}", conversation_id);
                return Effect::None;
            }
            state.append_assistant_text(&conversation_id, &text);
            Effect::None
        }
        Action::ReplyDone { conversation_id } => {
            if !state.is_generating(&conversation_id) {
                return Effect::None;
            }
            state.set_generation(&conversation_id, None);
            info!("Reply finished for {}", conversation_id);
            Effect::SaveConversations
        }
        Action::CancelGeneration => {
            let id = state.active_id().clone();
            if state.stop_generation(&id) {
                Effect::SaveConversations
            } else {
                Effect::None
            }
        }
        Action::NewConversation => {
            state.create_conversation(DEFAULT_PURPOSE_ID);
            Effect::None
        }
        Action::Activate(id) => {
            state.set_active(&id);
            Effect::None
        }
        Action::Delete(id) => match state.delete_conversation(&id) {
            Some(_) => Effect::SaveConversations,
            None => Effect::None,
        },
        Action::Quit => Effect::Quit,
    }
}
