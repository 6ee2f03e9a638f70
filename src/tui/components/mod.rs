//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as parameters:
//! - `TitleBar`: Top status line with the active conversation's title
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `ConversationItem`: One sidebar row with rename and two-step delete
//! - `ConversationList`: The sidebar, owning one row state per conversation
//! - `InlineEditor`: Single-line text field (rename, composer)
//! - `Transcript`: Scrollable messages of the active conversation
//!
//! ## Props-Based Data Flow
//!
//! Components receive external data as "props" (struct fields or
//! constructor arguments), not by reaching into global state. Store data
//! arrives as a snapshot selected for the current frame.
//!
//! ```text
//! components/
//! ├── mod.rs                (this file)
//! ├── conversation_item.rs  (Sidebar row)
//! ├── conversation_list.rs  (Sidebar / drawer)
//! ├── inline_editor.rs      (Single-line editor)
//! ├── title_bar.rs          (Top status bar)
//! └── transcript.rs         (Message view)
//! ```

pub mod conversation_item;
pub mod conversation_list;
pub mod inline_editor;
pub mod title_bar;
pub mod transcript;

pub use conversation_item::{
    ConversationItem, ConversationItemProps, ConversationItemState, ConversationView, ItemEvent,
    ItemInput, ItemTarget,
};
pub use conversation_list::{ConversationList, ConversationListState, ListEvent};
pub use inline_editor::{EditorEvent, InlineEditor};
pub use title_bar::TitleBar;
pub use transcript::{Transcript, TranscriptState};
