//! # Transcript Component
//!
//! Scrollable view of the active conversation's messages.
//!
//! `Transcript` is a transient component (created each frame) that wraps
//! `&'a mut TranscriptState` (persistent scroll state) and the conversation
//! (props). It sticks to the bottom while replies stream in, until the user
//! scrolls up.

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::conversation::{Conversation, Role};
use crate::core::purpose;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

pub struct TranscriptState {
    pub scroll_state: ScrollViewState,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    content_height: u16,
    viewport_height: u16,
}

impl Default for TranscriptState {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            stick_to_bottom: true,
            content_height: 0,
            viewport_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }
}

impl EventHandler for TranscriptState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<()> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                // Re-pin once the bottom is reached
                let offset = self.scroll_state.offset();
                if offset.y >= self.max_offset() {
                    self.stick_to_bottom = true;
                    self.scroll_state.set_offset(Position {
                        x: offset.x,
                        y: self.max_offset(),
                    });
                }
            }
            _ => return None,
        }
        Some(())
    }
}

fn role_style(role: Role) -> (Style, &'static str) {
    match role {
        Role::User => (Style::default().fg(Color::Cyan), "You"),
        Role::Assistant => (Style::default().fg(Color::Green), "Assistant"),
        Role::System => (Style::default().fg(Color::Yellow), "System"),
    }
}

/// Stack messages top to bottom as `(y, height)`. The scroll view is
/// addressed in `u16`, so placement saturates at `u16::MAX` and messages past
/// that point get zero height.
fn stack(line_counts: impl IntoIterator<Item = usize>) -> Vec<(u16, u16)> {
    let mut y: u16 = 0;
    line_counts
        .into_iter()
        .map(|count| {
            let height = u16::try_from(count).unwrap_or(u16::MAX).min(u16::MAX - y);
            let placed = (y, height);
            y += height;
            placed
        })
        .collect()
}

pub struct Transcript<'a> {
    pub state: &'a mut TranscriptState,
    pub conversation: Option<&'a Conversation>,
}

impl<'a> Transcript<'a> {
    pub fn new(state: &'a mut TranscriptState, conversation: Option<&'a Conversation>) -> Self {
        Self {
            state,
            conversation,
        }
    }
}

impl Component for Transcript<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let conversation = match self.conversation {
            Some(c) if !c.messages.is_empty() => c,
            other => {
                let label = other
                    .and_then(|c| purpose::find(&c.system_purpose_id))
                    .map(|p| p.label)
                    .unwrap_or("the assistant");
                let hint = Paragraph::new(format!("Start typing to chat with {label}."))
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Center);
                frame.render_widget(hint, area);
                return;
            }
        };

        let content_width = area.width.saturating_sub(1); // scrollbar column
        let paragraphs: Vec<Paragraph> = conversation
            .messages
            .iter()
            .map(|message| {
                let (style, label) = role_style(message.role);
                Paragraph::new(message.text.trim_end())
                    .block(
                        Block::bordered()
                            .title(label)
                            .border_style(style.add_modifier(Modifier::DIM)),
                    )
                    .style(style)
                    .wrap(Wrap { trim: false })
            })
            .collect();
        let placements = stack(paragraphs.iter().map(|p| p.line_count(content_width)));

        let total_height = placements.last().map(|(y, h)| y + h).unwrap_or(0);
        self.state.content_height = total_height;
        self.state.viewport_height = area.height;

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for (paragraph, (y, height)) in paragraphs.into_iter().zip(placements) {
            if height == 0 {
                break;
            }
            scroll_view.render_widget(paragraph, Rect::new(0, y, content_width, height));
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }
        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}
