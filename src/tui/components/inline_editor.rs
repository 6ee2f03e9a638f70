//! # InlineEditor Component
//!
//! Single-line text field. Used for renaming a conversation in place and for
//! the message composer.
//!
//! ## Responsibilities
//!
//! - Capture text input (newlines in pastes become spaces)
//! - Handle editing (backspace, delete, cursor movement)
//! - Emit `Submit` on Enter and `Cancel` on Esc
//! - Scroll horizontally so the cursor stays visible
//!
//! Widths are measured in terminal cells (`unicode-width`), so wide glyphs
//! such as emoji and CJK keep the cursor aligned.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// High-level events emitted by the editor
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// Enter pressed; carries the text, which is taken out of the buffer
    Submit(String),
    /// Esc pressed
    Cancel,
    /// Text or cursor changed
    Changed,
}

pub struct InlineEditor {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Whether blank text may be submitted (Prop)
    pub allow_empty: bool,
    /// Draw the terminal cursor when rendering (Prop)
    pub focused: bool,
    /// Text style (Prop)
    pub style: Style,
    /// Cursor as byte offset in `buffer`
    cursor: usize,
    /// First visible display column
    scroll: usize,
}

impl InlineEditor {
    /// Empty editor that refuses blank submissions.
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            allow_empty: false,
            focused: true,
            style: Style::default(),
            cursor: 0,
            scroll: 0,
        }
    }

    /// Editor pre-filled with `text`, cursor at the end. Blank text may be
    /// submitted.
    pub fn with_text(text: &str) -> Self {
        let buffer = single_line(text);
        Self {
            cursor: buffer.len(),
            buffer,
            allow_empty: true,
            ..Self::new()
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn insert(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    /// Text visible in a field `width` cells wide, after scrolling to keep
    /// the cursor in view. Returns the text and the cursor's column within it.
    fn visible(&mut self, width: usize) -> (String, usize) {
        if width == 0 {
            return (String::new(), 0);
        }
        let cursor_col = self.buffer[..self.cursor].width();
        if cursor_col < self.scroll {
            self.scroll = cursor_col;
        } else if cursor_col >= self.scroll + width {
            self.scroll = cursor_col + 1 - width;
        }

        let mut col = 0;
        let mut out = String::new();
        for c in self.buffer.chars() {
            let w = c.width().unwrap_or(0);
            if col >= self.scroll {
                if col + w > self.scroll + width {
                    break;
                }
                out.push(c);
            }
            col += w;
        }
        (out, cursor_col - self.scroll)
    }
}

impl Default for InlineEditor {
    fn default() -> Self {
        Self::new()
    }
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

impl Component for InlineEditor {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (text, cursor_col) = self.visible(area.width as usize);
        frame.render_widget(Span::styled(text, self.style), area);
        if self.focused && area.width > 0 {
            let x = area.x + (cursor_col as u16).min(area.width - 1);
            frame.set_cursor_position((x, area.y));
        }
    }
}

impl EventHandler for InlineEditor {
    type Event = EditorEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                if *c == '\n' {
                    return None;
                }
                self.insert(c.encode_utf8(&mut [0; 4]));
                Some(EditorEvent::Changed)
            }
            TuiEvent::Paste(text) => {
                self.insert(&single_line(text));
                Some(EditorEvent::Changed)
            }
            TuiEvent::Backspace => (self.cursor > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                EditorEvent::Changed
            }),
            TuiEvent::Delete => (self.cursor < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                EditorEvent::Changed
            }),
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                EditorEvent::Changed
            }),
            TuiEvent::CursorRight => (self.cursor < self.buffer.len()).then(|| {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                EditorEvent::Changed
            }),
            TuiEvent::CursorHome => (self.cursor != 0).then(|| {
                self.cursor = 0;
                EditorEvent::Changed
            }),
            TuiEvent::CursorEnd => (self.cursor != self.buffer.len()).then(|| {
                self.cursor = self.buffer.len();
                EditorEvent::Changed
            }),
            TuiEvent::Submit => {
                if !self.allow_empty && self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                self.scroll = 0;
                Some(EditorEvent::Submit(text))
            }
            TuiEvent::Escape => Some(EditorEvent::Cancel),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn type_str(editor: &mut InlineEditor, text: &str) {
        for c in text.chars() {
            editor.handle_event(&TuiEvent::InputChar(c));
        }
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut editor = InlineEditor::new();
        type_str(&mut editor, "héllo");
        assert_eq!(editor.buffer, "héllo");

        assert_eq!(editor.handle_event(&TuiEvent::Backspace), Some(EditorEvent::Changed));
        assert_eq!(editor.buffer, "héll");
    }

    #[test]
    fn test_cursor_movement_edits_in_place() {
        let mut editor = InlineEditor::with_text("ac");
        editor.handle_event(&TuiEvent::CursorLeft);
        type_str(&mut editor, "b");
        assert_eq!(editor.buffer, "abc");

        editor.handle_event(&TuiEvent::CursorHome);
        editor.handle_event(&TuiEvent::Delete);
        assert_eq!(editor.buffer, "bc");
        assert_eq!(editor.handle_event(&TuiEvent::CursorLeft), None);
    }

    #[test]
    fn test_with_text_prefills_and_puts_cursor_at_end() {
        let editor = InlineEditor::with_text("My chat");
        assert_eq!(editor.buffer, "My chat");
        assert_eq!(editor.cursor(), "My chat".len());
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut editor = InlineEditor::new();
        editor.handle_event(&TuiEvent::Paste("one\ntwo".to_string()));
        assert_eq!(editor.buffer, "one two");
    }

    #[test]
    fn test_blank_submit_refused_unless_allowed() {
        let mut composer = InlineEditor::new();
        type_str(&mut composer, "   ");
        assert_eq!(composer.handle_event(&TuiEvent::Submit), None);

        let mut rename = InlineEditor::with_text("Title");
        for _ in 0..5 {
            rename.handle_event(&TuiEvent::Backspace);
        }
        assert_eq!(
            rename.handle_event(&TuiEvent::Submit),
            Some(EditorEvent::Submit(String::new()))
        );
    }

    #[test]
    fn test_submit_takes_buffer() {
        let mut editor = InlineEditor::new();
        type_str(&mut editor, "hello");
        assert_eq!(
            editor.handle_event(&TuiEvent::Submit),
            Some(EditorEvent::Submit("hello".to_string()))
        );
        assert!(editor.buffer.is_empty());
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn test_escape_cancels() {
        let mut editor = InlineEditor::with_text("x");
        assert_eq!(editor.handle_event(&TuiEvent::Escape), Some(EditorEvent::Cancel));
        assert_eq!(editor.buffer, "x");
    }

    #[test]
    fn test_render_scrolls_to_cursor() {
        let backend = TestBackend::new(5, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut editor = InlineEditor::with_text("abcdefgh");

        terminal.draw(|f| editor.render(f, f.area())).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert_eq!(text, "efgh ");
    }
}
