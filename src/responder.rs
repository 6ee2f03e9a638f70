//! # Responder
//!
//! A stand-in assistant. It builds a canned reply from the prompt and the
//! conversation's purpose, then streams it word by word back to the event loop
//! as `Action`s, the same way a network provider would.
//!
//! The task's `AbortHandle` is stored on the conversation while it runs; that
//! handle is what makes the sidebar show "assistant typing".

use std::sync::mpsc::Sender;
use std::time::Duration;

use log::{debug, warn};

use crate::core::action::Action;
use crate::core::conversation::ConversationId;
use crate::core::purpose;

/// Build the full reply text for a prompt.
pub fn compose_reply(system_purpose_id: &str, prompt: &str) -> String {
    let label = purpose::find(system_purpose_id)
        .map(|p| p.label)
        .unwrap_or("Assistant");
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return format!("[{label}] I'm listening.");
    }
    format!("[{label}] You said: {prompt}")
}

/// Split a reply into chunks that keep their leading whitespace, so that
/// concatenating the chunks reproduces the reply exactly.
fn chunks(reply: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for c in reply.chars() {
        if c.is_whitespace() && !current.trim().is_empty() {
            out.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Stream `reply` to `tx` one word at a time, then send `ReplyDone`.
///
/// Stops early (without `ReplyDone`) if the receiver is gone.
pub async fn stream_reply(
    conversation_id: ConversationId,
    reply: String,
    delay: Duration,
    tx: Sender<Action>,
) {
    for text in chunks(&reply) {
        tokio::time::sleep(delay).await;
        debug!("Responder chunk for {} (len={})", conversation_id, text.len());
        let action = Action::ReplyChunk {
            conversation_id: conversation_id.clone(),
            text,
        };
        if tx.send(action).is_err() {
            warn!("Failed to send reply chunk: receiver dropped");
            return;
        }
    }
    if tx.send(Action::ReplyDone { conversation_id }).is_err() {
        warn!("Failed to send ReplyDone: receiver dropped");
    }
}
