//! # Conversation Persistence
//!
//! Save/load the conversation store to `~/.parley/conversations.json`.
//!
//! Empty conversations are not written; they are cheap to recreate. Writes
//! use atomic rename (write `.tmp`, then `rename()`) for crash safety.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::chats::ChatState;
use crate::core::conversation::{Conversation, ConversationId};

const STORE_FILE: &str = "conversations.json";

#[derive(Debug)]
pub enum PersistError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io(e) => write!(f, "conversation store I/O error: {e}"),
            PersistError::Json(e) => write!(f, "conversation store format error: {e}"),
        }
    }
}

impl std::error::Error for PersistError {}

impl From<io::Error> for PersistError {
    fn from(e: io::Error) -> Self {
        PersistError::Io(e)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(e: serde_json::Error) -> Self {
        PersistError::Json(e)
    }
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    active_id: &'a ConversationId,
    conversations: Vec<&'a Conversation>,
}

#[derive(Deserialize)]
struct StoreFile {
    active_id: Option<ConversationId>,
    #[serde(default)]
    conversations: Vec<Conversation>,
}

/// Returns `~/.parley/`, creating it if needed.
pub fn data_dir() -> io::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    let dir = home.join(".parley");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Returns `~/.parley/conversations.json`.
pub fn store_path() -> io::Result<PathBuf> {
    Ok(data_dir()?.join(STORE_FILE))
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> Result<(), PersistError> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Write every non-empty conversation in `state` to `path`.
pub fn save_to(path: &Path, state: &ChatState) -> Result<(), PersistError> {
    let file = StoreFileRef {
        active_id: state.active_id(),
        conversations: state
            .conversations()
            .iter()
            .filter(|c| !c.messages.is_empty())
            .collect(),
    };
    atomic_write_json(path, &file)?;
    debug!("Saved {} conversations to {}", file.conversations.len(), path.display());
    Ok(())
}

/// Load a conversation store from `path`. A missing file yields a fresh store.
pub fn load_from(path: &Path) -> Result<ChatState, PersistError> {
    if !path.exists() {
        return Ok(ChatState::new());
    }
    let json = fs::read_to_string(path)?;
    let file: StoreFile = serde_json::from_str(&json)?;
    info!("Loaded {} conversations from {}", file.conversations.len(), path.display());
    Ok(ChatState::from_parts(file.conversations, file.active_id))
}

/// Load from the default location, falling back to a fresh store on any error.
pub fn load_or_default() -> ChatState {
    let result = store_path()
        .map_err(PersistError::from)
        .and_then(|path| load_from(&path));
    match result {
        Ok(state) => state,
        Err(e) => {
            warn!("Failed to load conversations, starting fresh: {}", e);
            ChatState::new()
        }
    }
}

/// Save to the default location. Failures are logged, not propagated.
pub fn save_current(state: &ChatState) {
    let result = store_path()
        .map_err(PersistError::from)
        .and_then(|path| save_to(&path, state));
    if let Err(e) = result {
        warn!("Failed to save conversations: {}", e);
    }
}
