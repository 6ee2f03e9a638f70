use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

/// Two clicks on the same cell within this window form a double-click.
const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    ForceQuit, // Ctrl+C
    Escape,
    Submit,
    Tab,

    // Text editing
    InputChar(char),
    Paste(String), // Bracketed paste
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    CursorUp,
    CursorDown,

    // Commands
    Rename,              // F2
    ToggleSidebar,       // Ctrl+O
    ToggleDoubleClick,   // Ctrl+E
    NewConversation,     // Ctrl+N

    // Mouse
    MouseClick(u16, u16),
    MouseDoubleClick(u16, u16),
    ScrollUp,
    ScrollDown,

    Resize,
}

/// Turns raw left-button presses into clicks and double-clicks.
///
/// The first press of a pair is still delivered as a plain click; only the
/// second becomes `MouseDoubleClick`.
#[derive(Debug, Default)]
pub struct ClickTracker {
    last: Option<(Instant, u16, u16)>,
}

impl ClickTracker {
    pub fn classify(&mut self, col: u16, row: u16, now: Instant) -> TuiEvent {
        let is_double = self.last.is_some_and(|(at, c, r)| {
            c == col && r == row && now.saturating_duration_since(at) <= DOUBLE_CLICK_WINDOW
        });
        if is_double {
            // A third click starts a new pair
            self.last = None;
            TuiEvent::MouseDoubleClick(col, row)
        } else {
            self.last = Some((now, col, row));
            TuiEvent::MouseClick(col, row)
        }
    }
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate(clicks: &mut ClickTracker) -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO, clicks)
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: Duration, clicks: &mut ClickTracker) -> Option<TuiEvent> {
    let ready = match event::poll(timeout) {
        Ok(ready) => ready,
        Err(e) => {
            log::warn!("Event poll failed: {}", e);
            return None;
        }
    };
    if !ready {
        return None;
    }
    match event::read() {
        Ok(event) => translate(event, clicks),
        Err(e) => {
            log::warn!("Event read failed: {}", e);
            None
        }
    }
}

fn translate(event: Event, clicks: &mut ClickTracker) -> Option<TuiEvent> {
    match event {
        Event::Key(key_event) => {
            if key_event.kind == KeyEventKind::Release {
                return None;
            }
            log::debug!("Key event: {:?} with modifiers {:?}", key_event.code, key_event.modifiers);
            match (key_event.modifiers, key_event.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
                (KeyModifiers::CONTROL, KeyCode::Char('o')) => Some(TuiEvent::ToggleSidebar),
                (KeyModifiers::CONTROL, KeyCode::Char('e')) => Some(TuiEvent::ToggleDoubleClick),
                (KeyModifiers::CONTROL, KeyCode::Char('n')) => Some(TuiEvent::NewConversation),
                (KeyModifiers::CONTROL, _) => None,
                (_, KeyCode::Char(c)) => Some(TuiEvent::InputChar(c)),
                (_, KeyCode::Backspace) => Some(TuiEvent::Backspace),
                (_, KeyCode::Delete) => Some(TuiEvent::Delete),
                (_, KeyCode::Enter) => Some(TuiEvent::Submit),
                (_, KeyCode::Esc) => Some(TuiEvent::Escape),
                (_, KeyCode::Tab) => Some(TuiEvent::Tab),
                (_, KeyCode::Left) => Some(TuiEvent::CursorLeft),
                (_, KeyCode::Right) => Some(TuiEvent::CursorRight),
                (_, KeyCode::Home) => Some(TuiEvent::CursorHome),
                (_, KeyCode::End) => Some(TuiEvent::CursorEnd),
                (_, KeyCode::Up) => Some(TuiEvent::CursorUp),
                (_, KeyCode::Down) => Some(TuiEvent::CursorDown),
                (_, KeyCode::F(2)) => Some(TuiEvent::Rename),
                _ => None,
            }
        }
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(clicks.classify(
                mouse_event.column,
                mouse_event.row,
                Instant::now(),
            )),
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, MouseEvent};

    #[test]
    fn test_second_click_on_same_cell_is_double() {
        let mut clicks = ClickTracker::default();
        let t0 = Instant::now();
        assert_eq!(clicks.classify(3, 4, t0), TuiEvent::MouseClick(3, 4));
        assert_eq!(
            clicks.classify(3, 4, t0 + Duration::from_millis(150)),
            TuiEvent::MouseDoubleClick(3, 4)
        );
        // Third click starts over
        assert_eq!(
            clicks.classify(3, 4, t0 + Duration::from_millis(200)),
            TuiEvent::MouseClick(3, 4)
        );
    }

    #[test]
    fn test_slow_or_moved_click_is_single() {
        let mut clicks = ClickTracker::default();
        let t0 = Instant::now();
        clicks.classify(3, 4, t0);
        assert_eq!(
            clicks.classify(3, 4, t0 + Duration::from_millis(900)),
            TuiEvent::MouseClick(3, 4)
        );
        assert_eq!(
            clicks.classify(5, 4, t0 + Duration::from_millis(950)),
            TuiEvent::MouseClick(5, 4)
        );
    }

    #[test]
    fn test_translate_keys() {
        let mut clicks = ClickTracker::default();
        let ctrl_o = Event::Key(KeyEvent::new(KeyCode::Char('o'), KeyModifiers::CONTROL));
        assert_eq!(translate(ctrl_o, &mut clicks), Some(TuiEvent::ToggleSidebar));

        let f2 = Event::Key(KeyEvent::new(KeyCode::F(2), KeyModifiers::NONE));
        assert_eq!(translate(f2, &mut clicks), Some(TuiEvent::Rename));

        let shifted = Event::Key(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT));
        assert_eq!(translate(shifted, &mut clicks), Some(TuiEvent::InputChar('A')));
    }

    #[test]
    fn test_translate_left_click() {
        let mut clicks = ClickTracker::default();
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 7,
            row: 2,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(translate(click, &mut clicks), Some(TuiEvent::MouseClick(7, 2)));
    }
}
