//! # TitleBar Component
//!
//! Top status bar: app name, the active conversation's title, and a transient
//! status message.
//!
//! Stateless: it receives all data as props and renders a single line.
//!
//! 1. **Status message**: `"Parley | Physics homework | Renamed"`
//! 2. **Default**: `"Parley | Physics homework"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

pub struct TitleBar {
    /// Resolved title of the active conversation
    pub conversation_title: String,
    /// Status message (e.g., "Replying...", "Double-click to edit: off")
    pub status_message: String,
}

impl TitleBar {
    pub fn new(conversation_title: String, status_message: String) -> Self {
        Self {
            conversation_title,
            status_message,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled("Parley", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(" | {}", self.conversation_title)),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }
        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::buffer_text;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(title_bar: &mut TitleBar) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 1)).unwrap();
        terminal.draw(|f| title_bar.render(f, f.area())).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_title_bar_with_status_message() {
        let mut title_bar =
            TitleBar::new("Physics homework".to_string(), "Replying...".to_string());
        let text = draw(&mut title_bar);
        assert!(text.starts_with("Parley | Physics homework | Replying..."));
    }

    #[test]
    fn test_title_bar_default_no_status() {
        let mut title_bar = TitleBar::new("new conversation".to_string(), String::new());
        let text = draw(&mut title_bar);
        assert!(text.contains("Parley | new conversation"));
        assert_eq!(text.matches('|').count(), 1);
    }
}
