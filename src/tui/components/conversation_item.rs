//! # ConversationItem Component
//!
//! One row of the sidebar: purpose symbol, title, message-count progress, and
//! the delete controls.
//!
//! ## Responsibilities
//!
//! - Render a conversation's summary from a store snapshot
//! - Activate the conversation on click
//! - Rename in place (double-click on the title, or F2)
//! - Two-step delete: arm with the trigger, then confirm or cancel
//!
//! ## Delete confirmation
//!
//! ```text
//!            trigger click (row active)
//!   ┌─────────┐ ─────────────────────────▶ ┌───────┐
//!   │ unarmed │                            │ armed │
//!   └─────────┘ ◀───────────────────────── └───────┘
//!        │        confirm (emits Delete)
//!        │        cancel
//!        │        row became inactive (reconcile)
//!        │
//!        └─ trigger click (row inactive): stays unarmed, emits Activate
//!           with close_menu = false, so a row can't be deleted before it
//!           has been selected
//! ```
//!
//! ## State Ownership
//!
//! - Props (`ConversationItemProps`) come from the sidebar.
//! - `ConversationView` is a snapshot selected from the conversation store.
//!   When the conversation is gone the row renders nothing and ignores input.
//! - `ConversationItemState` is local: created when the row mounts, dropped
//!   when the conversation leaves the list.
//!
//! Follows the persistent state + transient wrapper pattern:
//! `ConversationItem` is created each frame with borrowed state.

use log::debug;
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::chats::ChatState;
use crate::core::conversation::{ConversationId, FALLBACK_TITLE, conversation_title};
use crate::core::preferences::UiPreferences;
use crate::core::purpose;
use crate::core::store::Store;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::inline_editor::{EditorEvent, InlineEditor};
use crate::tui::event::TuiEvent;

/// Leading glyph while the assistant is typing.
const TYPING_SYMBOL: &str = "✍";
/// Symbol column: one cell padding each side of a (up to) two-cell glyph.
const SYMBOL_WIDTH: u16 = 4;
const TRIGGER_LABEL: &str = " [x]";
const CONFIRM_LABEL: &str = " [delete]";
const CANCEL_LABEL: &str = " [cancel]";

/// The store operation a row uses to rename its conversation.
pub trait ConversationRenamer {
    fn set_user_title(&mut self, conversation_id: &ConversationId, title: &str);
}

impl ConversationRenamer for Store<ChatState> {
    fn set_user_title(&mut self, conversation_id: &ConversationId, title: &str) {
        self.update(|state| state.set_user_title(conversation_id, title));
    }
}

/// Props supplied by the sidebar.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationItemProps {
    pub conversation_id: ConversationId,
    pub is_active: bool,
    /// Only conversation in the list; hides the delete controls.
    pub is_lonely: bool,
    /// 0 disables the progress bar.
    pub max_chat_messages: u32,
    pub show_symbols: bool,
}

/// The slice of the conversation store a row reads.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationView {
    pub is_new: bool,
    pub message_count: usize,
    pub assistant_typing: bool,
    pub system_purpose_id: String,
    pub title: String,
}

impl ConversationView {
    /// Select the view for `id`, or None if the conversation no longer exists.
    pub fn select(state: &ChatState, id: &ConversationId) -> Option<Self> {
        let conversation = state.conversation(id)?;
        Some(Self {
            is_new: conversation.messages.is_empty(),
            message_count: conversation.messages.len(),
            assistant_typing: conversation.is_generating(),
            system_purpose_id: conversation.system_purpose_id.clone(),
            title: conversation_title(conversation, FALLBACK_TITLE),
        })
    }
}

/// Interactive parts of a row, as resolved by hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemTarget {
    Row,
    Title,
    Editor,
    DeleteTrigger,
    ConfirmDelete,
    CancelDelete,
}

/// Input delivered to a row by the sidebar.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemInput {
    Click(ItemTarget),
    DoubleClick(ItemTarget),
    /// Keystroke for the title editor
    Key(TuiEvent),
    /// Focus moved away from the row
    Blur,
}

/// Events a row emits to the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemEvent {
    Activate {
        conversation_id: ConversationId,
        close_menu: bool,
    },
    Delete(ConversationId),
}

/// Screen regions recorded during the last render, for hit testing.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ItemRegions {
    pub row: Rect,
    pub title: Rect,
    pub trigger: Option<Rect>,
    pub confirm: Option<Rect>,
    pub cancel: Option<Rect>,
}

impl ItemRegions {
    /// Innermost target under `(col, row)`, if it falls inside the row.
    pub fn hit_test(&self, col: u16, row: u16, editing: bool) -> Option<ItemTarget> {
        let pos = Position::new(col, row);
        if !self.row.contains(pos) {
            return None;
        }
        let controls = [
            (self.trigger, ItemTarget::DeleteTrigger),
            (self.confirm, ItemTarget::ConfirmDelete),
            (self.cancel, ItemTarget::CancelDelete),
        ];
        for (rect, target) in controls {
            if rect.is_some_and(|r| r.contains(pos)) {
                return Some(target);
            }
        }
        if self.title.contains(pos) {
            return Some(if editing { ItemTarget::Editor } else { ItemTarget::Title });
        }
        Some(ItemTarget::Row)
    }
}

/// Local UI state of one row.
#[derive(Default)]
pub struct ConversationItemState {
    /// Present while the title is being edited.
    editor: Option<InlineEditor>,
    delete_armed: bool,
    regions: ItemRegions,
}

impl ConversationItemState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing_title(&self) -> bool {
        self.editor.is_some()
    }

    pub fn is_delete_armed(&self) -> bool {
        self.delete_armed
    }

    pub fn editor(&self) -> Option<&InlineEditor> {
        self.editor.as_ref()
    }

    pub fn regions(&self) -> &ItemRegions {
        &self.regions
    }

    /// Forget hit-test regions (row scrolled out of view).
    pub fn clear_regions(&mut self) {
        self.regions = ItemRegions::default();
    }

    /// Whether the title editor (if any) shows the terminal cursor.
    pub fn set_focused(&mut self, focused: bool) {
        if let Some(editor) = self.editor.as_mut() {
            editor.focused = focused;
        }
    }

    pub fn hit_test(&self, col: u16, row: u16) -> Option<ItemTarget> {
        self.regions.hit_test(col, row, self.is_editing_title())
    }

    /// Run after every transition: an armed delete never outlives the row
    /// being active.
    pub fn reconcile(&mut self, is_active: bool) {
        if self.delete_armed && !is_active {
            debug!("Disarming delete on deactivated row");
            self.delete_armed = false;
        }
    }

    /// Enter edit mode with the editor pre-filled with `title`.
    pub fn begin_rename(&mut self, title: &str) {
        self.editor = Some(InlineEditor::with_text(title));
    }

    /// Leave edit mode and forward `text` to the store as-is.
    fn commit_rename(
        &mut self,
        conversation_id: &ConversationId,
        text: &str,
        renamer: &mut dyn ConversationRenamer,
    ) {
        self.editor = None;
        renamer.set_user_title(conversation_id, text);
    }

    /// Commit an in-progress edit with whatever the editor holds.
    fn blur(&mut self, conversation_id: &ConversationId, renamer: &mut dyn ConversationRenamer) {
        if let Some(editor) = self.editor.as_ref() {
            let text = editor.buffer.clone();
            self.commit_rename(conversation_id, &text, renamer);
        }
    }

    pub fn handle_input(
        &mut self,
        input: &ItemInput,
        props: &ConversationItemProps,
        view: Option<&ConversationView>,
        prefs: &UiPreferences,
        renamer: &mut dyn ConversationRenamer,
    ) -> Option<ItemEvent> {
        let view = view?;
        let id = &props.conversation_id;
        match input {
            ItemInput::Key(event) => {
                let editor = self.editor.as_mut()?;
                match editor.handle_event(event)? {
                    EditorEvent::Submit(text) => {
                        self.commit_rename(id, &text, renamer);
                        None
                    }
                    EditorEvent::Cancel => {
                        self.editor = None;
                        None
                    }
                    EditorEvent::Changed => None,
                }
            }
            ItemInput::Blur => {
                self.blur(id, renamer);
                None
            }
            ItemInput::DoubleClick(target) => match target {
                ItemTarget::Title if prefs.double_click_to_edit && !self.is_editing_title() => {
                    self.begin_rename(&view.title);
                    None
                }
                // A fast double-click must not arm and confirm in one go.
                ItemTarget::DeleteTrigger
                | ItemTarget::ConfirmDelete
                | ItemTarget::CancelDelete => None,
                _ => self.click(*target, props, renamer),
            },
            ItemInput::Click(target) => self.click(*target, props, renamer),
        }
    }

    fn click(
        &mut self,
        target: ItemTarget,
        props: &ConversationItemProps,
        renamer: &mut dyn ConversationRenamer,
    ) -> Option<ItemEvent> {
        let id = &props.conversation_id;
        if target == ItemTarget::Editor {
            return None;
        }
        self.blur(id, renamer);

        let activate = |close_menu| ItemEvent::Activate {
            conversation_id: id.clone(),
            close_menu,
        };

        // Controls that aren't on screen can't be clicked; the click lands on the row.
        let shown = !props.is_lonely;
        match target {
            ItemTarget::DeleteTrigger if shown && !self.delete_armed => {
                if !props.is_active {
                    Some(activate(false))
                } else {
                    self.delete_armed = true;
                    None
                }
            }
            ItemTarget::ConfirmDelete if shown && self.delete_armed => {
                self.delete_armed = false;
                Some(ItemEvent::Delete(id.clone()))
            }
            ItemTarget::CancelDelete if shown && self.delete_armed => {
                self.delete_armed = false;
                // Cancel doesn't swallow the click
                Some(activate(true))
            }
            _ => Some(activate(true)),
        }
    }
}

/// Progress of a conversation toward the message limit, in percent.
/// Not clamped; 0 when there is no limit.
pub fn progress_percent(message_count: usize, max_chat_messages: u32) -> f64 {
    if max_chat_messages == 0 {
        return 0.0;
    }
    100.0 * message_count as f64 / max_chat_messages as f64
}

/// Cells of a `width`-wide row covered by the progress bar. The row's width
/// is the only clamp.
fn progress_cells(percent: f64, width: u16) -> u16 {
    let cells = (percent / 100.0 * width as f64).round();
    if cells <= 0.0 {
        0
    } else {
        (cells as u16).min(width)
    }
}

/// Cut `text` to `max` display cells, ending with "…" when cut.
fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Transient render wrapper for one row.
pub struct ConversationItem<'a> {
    props: &'a ConversationItemProps,
    view: Option<&'a ConversationView>,
    state: &'a mut ConversationItemState,
}

impl<'a> ConversationItem<'a> {
    pub fn new(
        props: &'a ConversationItemProps,
        view: Option<&'a ConversationView>,
        state: &'a mut ConversationItemState,
    ) -> Self {
        Self { props, view, state }
    }

    fn base_style(&self) -> Style {
        if self.props.is_active {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Gray)
        }
    }

    fn symbol(&self, view: &ConversationView) -> &'static str {
        if view.assistant_typing {
            TYPING_SYMBOL
        } else if view.is_new {
            ""
        } else {
            purpose::symbol_for(&view.system_purpose_id)
        }
    }
}

impl Component for ConversationItem<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let Some(view) = self.view else {
            self.state.regions = ItemRegions::default();
            return;
        };
        let area = Rect { height: area.height.min(1), ..area };
        let style = self.base_style();
        frame.buffer_mut().set_style(area, style);

        let mut regions = ItemRegions {
            row: area,
            ..Default::default()
        };
        let mut x = area.x;
        let right = area.x + area.width;

        if self.props.show_symbols && area.width > SYMBOL_WIDTH {
            let symbol_area = Rect::new(x + 1, area.y, SYMBOL_WIDTH - 1, 1);
            frame.render_widget(Span::styled(self.symbol(view), style), symbol_area);
            x += SYMBOL_WIDTH;
        } else {
            x = (x + 1).min(right);
        }

        // Delete controls, laid out from the right edge
        let mut controls_x = right;
        if !self.props.is_lonely {
            let place = |label: &str, end: &mut u16| -> Option<Rect> {
                let w = label.width() as u16;
                (*end >= x + w).then(|| {
                    *end -= w;
                    Rect::new(*end, area.y, w, 1)
                })
            };
            if self.state.delete_armed {
                regions.cancel = place(CANCEL_LABEL, &mut controls_x);
                regions.confirm = place(CONFIRM_LABEL, &mut controls_x);
                if let Some(rect) = regions.confirm {
                    let danger = Style::default()
                        .fg(Color::Red)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED);
                    frame.render_widget(Span::styled(CONFIRM_LABEL, danger), rect);
                }
                if let Some(rect) = regions.cancel {
                    frame.render_widget(Span::styled(CANCEL_LABEL, style), rect);
                }
            } else {
                regions.trigger = place(TRIGGER_LABEL, &mut controls_x);
                if let Some(rect) = regions.trigger {
                    frame.render_widget(Span::styled(TRIGGER_LABEL, style), rect);
                }
            }
        }

        // Title (or editor) fills what's left, keeping one cell of gap
        regions.title = Rect::new(x, area.y, controls_x.saturating_sub(x + 1), 1);
        if let Some(editor) = self.state.editor.as_mut() {
            editor.style = style.remove_modifier(Modifier::BOLD).add_modifier(Modifier::ITALIC);
            editor.render(frame, regions.title);
        } else {
            let mut title = view.title.clone();
            if view.assistant_typing {
                title.push_str("...");
            }
            let text = truncate_to_width(&title, regions.title.width as usize);
            frame.render_widget(Span::styled(text, style), regions.title);
        }

        // Progress bar: underline the first cells of the row
        let percent = progress_percent(view.message_count, self.props.max_chat_messages);
        let cells = progress_cells(percent, area.width);
        if cells > 0 {
            let bar = Rect { width: cells, ..area };
            frame
                .buffer_mut()
                .set_style(bar, Style::default().add_modifier(Modifier::UNDERLINED));
        }

        self.state.regions = regions;
    }
}
