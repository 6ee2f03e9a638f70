use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::Block;

use crate::core::chats::ChatState;
use crate::core::conversation::{FALLBACK_TITLE, conversation_title};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{ConversationList, TitleBar, Transcript};

/// Width of the sidebar, docked or as a drawer.
pub const SIDEBAR_WIDTH: u16 = 34;

/// Split the main area into (sidebar, transcript).
///
/// Wide terminals dock the sidebar on the left. Narrow ones give the whole
/// area to the transcript and draw the sidebar over it when the drawer is
/// open.
fn split_main(main_area: Rect, docked: bool, drawer_open: bool) -> (Option<Rect>, Rect) {
    use Constraint::{Length, Min};
    if docked {
        let [sidebar, transcript] =
            Layout::horizontal([Length(SIDEBAR_WIDTH), Min(0)]).areas(main_area);
        (Some(sidebar), transcript)
    } else if drawer_open {
        let drawer = Rect {
            width: SIDEBAR_WIDTH.min(main_area.width),
            ..main_area
        };
        (Some(drawer), main_area)
    } else {
        (None, main_area)
    }
}

pub fn draw_ui(frame: &mut Frame, chats: &ChatState, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(3)]);
    let [title_area, main_area, input_area] = layout.areas(frame.area());

    let docked = frame.area().width >= tui.sidebar_min_width;
    tui.list.overlay = !docked;
    let (sidebar_area, transcript_area) = split_main(main_area, docked, tui.list.open);
    tui.sidebar_area = sidebar_area;

    // Title bar
    let active = chats.active();
    let title = active
        .map(|c| conversation_title(c, FALLBACK_TITLE))
        .unwrap_or_else(|| FALLBACK_TITLE.to_string());
    let status = if chats.is_generating(chats.active_id()) {
        "Replying... (Esc to stop)".to_string()
    } else {
        tui.status_message.clone()
    };
    TitleBar::new(title, status).render(frame, title_area);

    Transcript::new(&mut tui.transcript, active).render(frame, transcript_area);

    // Drawn after the transcript so the drawer covers it
    if let Some(area) = sidebar_area {
        ConversationList::new(&mut tui.list, chats).render(frame, area);
    }

    // Composer
    let composer_focused = !tui.list.focused;
    let border = if composer_focused { Color::Cyan } else { Color::DarkGray };
    let block = Block::bordered()
        .title("Message")
        .border_style(Style::default().fg(border));
    let inner = block.inner(input_area);
    frame.render_widget(block, input_area);
    tui.composer.focused = composer_focused;
    tui.composer.render(frame, inner);
}
