//! # Conversation List Component
//!
//! The sidebar: one `ConversationItem` row per conversation, newest first.
//! Docked on the left of wide terminals, a drawer overlay (toggled with
//! Ctrl+O) on narrow ones.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `ConversationListState` lives in `TuiState`
//! - `ConversationList` is created each frame with borrowed state
//!
//! ## Row lifecycle
//!
//! `sync()` runs before and after every event. It mounts state for new
//! conversations, drops state for deleted ones, and reconciles every row
//! against the active conversation so an armed delete never survives its row
//! being deselected.

use std::collections::HashMap;

use log::debug;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear};

use crate::core::action::{self, Action, Effect};
use crate::core::chats::ChatState;
use crate::core::conversation::ConversationId;
use crate::core::preferences::UiPreferences;
use crate::core::store::Store;
use crate::tui::component::Component;
use crate::tui::components::conversation_item::{
    ConversationItem, ConversationItemProps, ConversationItemState, ConversationView, ItemEvent,
    ItemInput, ItemTarget,
};
use crate::tui::event::TuiEvent;

/// Events the sidebar hands back to the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    /// The conversation store changed in a way worth persisting
    Save,
    /// Focus should move back to the composer
    Dismiss,
}

/// Persistent state for the sidebar.
pub struct ConversationListState {
    rows: HashMap<ConversationId, ConversationItemState>,
    order: Vec<ConversationId>,
    /// Keyboard cursor (index into the list)
    pub cursor: usize,
    /// First visible row
    pub scroll: usize,
    /// Keep the cursor row in view when rendering; cleared by the mouse wheel
    follow_cursor: bool,
    /// Drawer visibility; only consulted when `overlay` is true
    pub open: bool,
    pub focused: bool,
    /// Shown as a drawer over the chat instead of docked (set by the layout)
    pub overlay: bool,
    pub max_chat_messages: u32,
    pub show_symbols: bool,
}

impl ConversationListState {
    pub fn new(max_chat_messages: u32, show_symbols: bool) -> Self {
        Self {
            rows: HashMap::new(),
            order: Vec::new(),
            cursor: 0,
            scroll: 0,
            follow_cursor: true,
            open: false,
            focused: false,
            overlay: false,
            max_chat_messages,
            show_symbols,
        }
    }

    /// Whether the sidebar takes up screen space this frame.
    pub fn is_visible(&self) -> bool {
        !self.overlay || self.open
    }

    pub fn row(&self, id: &ConversationId) -> Option<&ConversationItemState> {
        self.rows.get(id)
    }

    pub fn order(&self) -> &[ConversationId] {
        &self.order
    }

    /// Mount/unmount rows to match the store and reconcile each against the
    /// active conversation.
    pub fn sync(&mut self, state: &ChatState) {
        self.order = state.conversations().iter().map(|c| c.id.clone()).collect();
        let order = &self.order;
        self.rows.retain(|id, _| order.contains(id));
        for id in &self.order {
            self.rows.entry(id.clone()).or_default();
        }
        for (id, row) in self.rows.iter_mut() {
            row.reconcile(state.active_id() == id);
        }
        self.cursor = self.cursor.min(self.order.len().saturating_sub(1));
    }

    /// Put the cursor on the active conversation.
    pub fn focus_active(&mut self, state: &ChatState) {
        self.sync(state);
        if let Some(i) = self.order.iter().position(|id| id == state.active_id()) {
            self.cursor = i;
        }
        self.follow_cursor = true;
    }

    fn props_for(&self, state: &ChatState, id: &ConversationId) -> ConversationItemProps {
        ConversationItemProps {
            conversation_id: id.clone(),
            is_active: state.active_id() == id,
            is_lonely: state.len() == 1,
            max_chat_messages: self.max_chat_messages,
            show_symbols: self.show_symbols,
        }
    }

    /// Commit any title edit in progress (focus left the sidebar).
    pub fn blur_all(&mut self, chats: &mut Store<ChatState>, prefs: &UiPreferences) {
        for i in 0..self.order.len() {
            self.blur_row(i, chats, prefs);
        }
    }

    fn blur_row(&mut self, index: usize, chats: &mut Store<ChatState>, prefs: &UiPreferences) {
        let editing = self
            .order
            .get(index)
            .and_then(|id| self.rows.get(id))
            .is_some_and(ConversationItemState::is_editing_title);
        if editing {
            self.deliver(index, &ItemInput::Blur, chats, prefs);
        }
    }

    /// Route a terminal event to the sidebar. Call only while it is focused
    /// (keys) or for clicks inside its area.
    pub fn handle_event(
        &mut self,
        event: &TuiEvent,
        chats: &mut Store<ChatState>,
        prefs: &UiPreferences,
    ) -> Option<ListEvent> {
        self.sync(chats.state());
        let result = self.dispatch(event, chats, prefs);
        self.sync(chats.state());
        result
    }

    fn dispatch(
        &mut self,
        event: &TuiEvent,
        chats: &mut Store<ChatState>,
        prefs: &UiPreferences,
    ) -> Option<ListEvent> {
        self.follow_cursor = !matches!(event, TuiEvent::ScrollUp | TuiEvent::ScrollDown);
        match event {
            TuiEvent::MouseClick(col, row) | TuiEvent::MouseDoubleClick(col, row) => {
                let (index, target) = self.hit_test(*col, *row)?;
                for i in (0..self.order.len()).filter(|i| *i != index) {
                    self.blur_row(i, chats, prefs);
                }
                self.cursor = index;
                self.focused = true;
                let input = if matches!(event, TuiEvent::MouseDoubleClick(..)) {
                    ItemInput::DoubleClick(target)
                } else {
                    ItemInput::Click(target)
                };
                return self.deliver(index, &input, chats, prefs);
            }
            TuiEvent::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(1);
                return None;
            }
            TuiEvent::ScrollDown => {
                self.scroll = (self.scroll + 1).min(self.order.len().saturating_sub(1));
                return None;
            }
            _ => {}
        }

        let index = self.cursor;
        let id = self.order.get(index)?.clone();
        let row = self.rows.get(&id)?;

        // Leaving the sidebar commits an open title edit
        if matches!(event, TuiEvent::Tab) {
            self.blur_row(index, chats, prefs);
            return Some(self.dismiss());
        }

        // An open title editor gets every other key
        if row.is_editing_title() {
            return self.deliver(index, &ItemInput::Key(event.clone()), chats, prefs);
        }

        let armed = row.is_delete_armed();
        let controls_shown = chats.state().len() > 1;
        match event {
            TuiEvent::CursorUp => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            TuiEvent::CursorDown => {
                self.cursor = (self.cursor + 1).min(self.order.len().saturating_sub(1));
                None
            }
            TuiEvent::Submit => {
                self.deliver(index, &ItemInput::Click(ItemTarget::Row), chats, prefs)
            }
            TuiEvent::InputChar('d') | TuiEvent::Delete if controls_shown => {
                let target = if armed {
                    ItemTarget::ConfirmDelete
                } else {
                    ItemTarget::DeleteTrigger
                };
                self.deliver(index, &ItemInput::Click(target), chats, prefs)
            }
            TuiEvent::Escape if armed && controls_shown => {
                self.deliver(index, &ItemInput::Click(ItemTarget::CancelDelete), chats, prefs)
            }
            TuiEvent::Rename | TuiEvent::InputChar('r') => {
                self.deliver(index, &ItemInput::DoubleClick(ItemTarget::Title), chats, prefs)
            }
            TuiEvent::InputChar('n') | TuiEvent::NewConversation => {
                chats.update(|s| action::update(s, Action::NewConversation));
                self.cursor = 0;
                None
            }
            TuiEvent::Escape => Some(self.dismiss()),
            _ => None,
        }
    }

    fn dismiss(&mut self) -> ListEvent {
        self.focused = false;
        if self.overlay {
            self.open = false;
        }
        ListEvent::Dismiss
    }

    /// Row index and target under a screen position.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<(usize, ItemTarget)> {
        self.order.iter().enumerate().find_map(|(i, id)| {
            self.rows
                .get(id)
                .and_then(|r| r.hit_test(col, row))
                .map(|target| (i, target))
        })
    }

    fn deliver(
        &mut self,
        index: usize,
        input: &ItemInput,
        chats: &mut Store<ChatState>,
        prefs: &UiPreferences,
    ) -> Option<ListEvent> {
        let id = self.order.get(index)?.clone();
        let props = self.props_for(chats.state(), &id);
        let view = ConversationView::select(chats.state(), &id);
        let row = self.rows.get_mut(&id)?;
        let item_event = row.handle_input(input, &props, view.as_ref(), prefs, chats)?;
        self.apply(item_event, chats)
    }

    fn apply(&mut self, event: ItemEvent, chats: &mut Store<ChatState>) -> Option<ListEvent> {
        debug!("Sidebar row event: {:?}", event);
        match event {
            ItemEvent::Activate {
                conversation_id,
                close_menu,
            } => {
                chats.update(|s| action::update(s, Action::Activate(conversation_id.clone())));
                if let Some(i) = self.order.iter().position(|id| *id == conversation_id) {
                    self.cursor = i;
                }
                if close_menu && self.overlay {
                    return Some(self.dismiss());
                }
                None
            }
            ItemEvent::Delete(conversation_id) => {
                let effect = chats.update(|s| action::update(s, Action::Delete(conversation_id)));
                self.focus_active(chats.state());
                (effect == Effect::SaveConversations).then_some(ListEvent::Save)
            }
        }
    }
}

/// Transient render wrapper for the sidebar.
pub struct ConversationList<'a> {
    state: &'a mut ConversationListState,
    chats: &'a ChatState,
}

impl<'a> ConversationList<'a> {
    pub fn new(state: &'a mut ConversationListState, chats: &'a ChatState) -> Self {
        Self { state, chats }
    }

    fn help_text(&self) -> &'static str {
        let armed = self
            .state
            .order
            .get(self.state.cursor)
            .and_then(|id| self.state.rows.get(id))
            .is_some_and(ConversationItemState::is_delete_armed);
        if armed {
            " d Confirm delete | Esc Cancel "
        } else if self.state.focused {
            " Enter Open  d Delete  F2 Rename  n New "
        } else {
            " Ctrl+O Conversations "
        }
    }
}

impl Component for ConversationList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.sync(self.chats);

        if self.state.overlay {
            frame.render_widget(Clear, area);
        }
        let border = if self.state.focused { Color::Cyan } else { Color::DarkGray };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Conversations ")
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(self.help_text()).centered());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let height = inner.height as usize;
        if self.state.follow_cursor {
            if self.state.cursor < self.state.scroll {
                self.state.scroll = self.state.cursor;
            } else if height > 0 && self.state.cursor >= self.state.scroll + height {
                self.state.scroll = self.state.cursor + 1 - height;
            }
        }
        // No blank space below the last row
        self.state.scroll = self.state.scroll.min(self.state.order.len().saturating_sub(height));

        let state = &mut *self.state;
        for (i, id) in state.order.iter().enumerate() {
            let props = ConversationItemProps {
                conversation_id: id.clone(),
                is_active: self.chats.active_id() == id,
                is_lonely: self.chats.len() == 1,
                max_chat_messages: state.max_chat_messages,
                show_symbols: state.show_symbols,
            };
            let Some(row) = state.rows.get_mut(id) else {
                continue;
            };
            let visible = i >= state.scroll && i < state.scroll + height;
            if !visible || inner.width < 2 {
                row.clear_regions();
                continue;
            }
            let y = inner.y + (i - state.scroll) as u16;
            let is_cursor = state.focused && i == state.cursor;
            if is_cursor {
                frame.render_widget(
                    Span::styled("›", Style::default().fg(Color::Cyan)),
                    Rect::new(inner.x, y, 1, 1),
                );
            }
            row.set_focused(is_cursor);
            let view = ConversationView::select(self.chats, id);
            let row_area = Rect::new(inner.x + 1, y, inner.width - 1, 1);
            ConversationItem::new(&props, view.as_ref(), row).render(frame, row_area);
        }
    }
}
