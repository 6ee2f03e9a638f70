use ratatui::Frame;
use ratatui::layout::Rect;

use crate::tui::event::TuiEvent;

/// Something that draws itself into a `Rect`.
///
/// Stateful components are split in two: a persistent `XState` kept in
/// `TuiState`, and a short-lived `X<'a>` built each frame from borrowed state
/// plus props (store snapshots, flags from the parent).
///
/// `render` takes `&mut self` because rendering records layout: sidebar rows
/// store their hit-test regions, the transcript its content height.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Turns low-level `TuiEvent`s into a component's own events.
///
/// Returning `None` means the event was ignored or only changed local state.
pub trait EventHandler {
    type Event;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
