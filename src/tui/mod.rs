//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and routes keyboard and mouse events to the sidebar or the composer.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The loop redraws after any terminal event. It blocks on crossterm for up
//! to 200ms, then drains whatever the responder queued meanwhile, so a
//! streamed word can wait up to one poll interval. Store subscriptions
//! flag the remaining work: a redraw when the active conversation changes
//! underneath us, a save when a title changes, a status line when a
//! preference flips.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call.

pub mod component;
pub mod components;
pub mod event;
pub mod ui;

use std::cell::Cell;
use std::io::stdout;
use std::rc::Rc;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use log::{debug, info};
use ratatui::layout::{Position, Rect};

use crate::core::action::{Action, Effect, update};
use crate::core::chats::ChatState;
use crate::core::config::ResolvedConfig;
use crate::core::conversation::ConversationId;
use crate::core::persistence;
use crate::core::preferences::UiPreferences;
use crate::core::store::Store;
use crate::responder;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    ConversationListState, EditorEvent, InlineEditor, ListEvent, TranscriptState,
};
use crate::tui::event::{ClickTracker, TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of the conversation store)
pub struct TuiState {
    // Persistent component states
    pub list: ConversationListState,
    pub transcript: TranscriptState,
    pub composer: InlineEditor,
    pub status_message: String,
    /// Terminals at least this wide dock the sidebar
    pub sidebar_min_width: u16,
    /// Where the sidebar was last drawn (None when hidden)
    pub sidebar_area: Option<Rect>,
}

impl TuiState {
    pub fn new(config: &ResolvedConfig) -> Self {
        Self {
            list: ConversationListState::new(config.max_chat_messages, config.show_symbols),
            transcript: TranscriptState::new(),
            composer: InlineEditor::new(),
            status_message: String::new(),
            sidebar_min_width: config.sidebar_min_width,
            sidebar_area: None,
        }
    }

    fn sidebar_contains(&self, col: u16, row: u16) -> bool {
        self.sidebar_area
            .is_some_and(|area| area.contains(Position { x: col, y: row }))
    }

    /// Move keyboard focus to the sidebar, opening the drawer if needed.
    fn focus_sidebar(&mut self, chats: &ChatState) {
        self.list.open = true;
        self.list.focused = true;
        self.list.focus_active(chats);
    }

    /// Move keyboard focus back to the composer, committing any open rename.
    fn focus_composer(&mut self, chats: &mut Store<ChatState>, prefs: &UiPreferences) {
        self.list.blur_all(chats, prefs);
        self.list.focused = false;
        if self.list.overlay {
            self.list.open = false;
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide // Hide cursor on exit
        );
    }
}

/// Everything needed to start a responder task.
struct ReplySpawner {
    tx: mpsc::Sender<Action>,
    delay: Duration,
}

impl ReplySpawner {
    /// Spawn the responder for `conversation_id` and record its handle on
    /// the conversation, which is what marks it as generating.
    fn spawn(&self, chats: &mut Store<ChatState>, conversation_id: ConversationId) {
        let Some(conversation) = chats.state().conversation(&conversation_id) else {
            return;
        };
        let prompt = conversation
            .messages
            .last()
            .map(|m| m.text.clone())
            .unwrap_or_default();
        let reply = responder::compose_reply(&conversation.system_purpose_id, &prompt);
        info!("Spawning responder for {}", conversation_id);

        let task = tokio::spawn(responder::stream_reply(
            conversation_id.clone(),
            reply,
            self.delay,
            self.tx.clone(),
        ));
        chats.update(|s| s.set_generation(&conversation_id, Some(task.abort_handle())));
    }
}

/// Carry out an `Effect`. Returns true when the app should quit.
fn run_effect(effect: Effect, chats: &mut Store<ChatState>, spawner: &ReplySpawner) -> bool {
    match effect {
        Effect::None => {}
        Effect::SpawnReply(id) => spawner.spawn(chats, id),
        Effect::SaveConversations => persistence::save_current(chats.state()),
        Effect::Quit => return true,
    }
    false
}

fn apply_list_event(
    event: ListEvent,
    tui: &mut TuiState,
    chats: &mut Store<ChatState>,
    prefs: &UiPreferences,
) {
    match event {
        ListEvent::Save => persistence::save_current(chats.state()),
        ListEvent::Dismiss => tui.focus_composer(chats, prefs),
    }
}

/// Route one terminal event. Returns true when the app should quit.
fn handle_event(
    event: TuiEvent,
    tui: &mut TuiState,
    chats: &mut Store<ChatState>,
    prefs: &mut Store<UiPreferences>,
    spawner: &ReplySpawner,
) -> bool {
    let current_prefs = *prefs.state();
    match event {
        // Resize just needs a redraw
        TuiEvent::Resize => false,
        TuiEvent::ForceQuit => {
            let effect = chats.update(|s| update(s, Action::Quit));
            run_effect(effect, chats, spawner)
        }
        TuiEvent::ToggleSidebar => {
            if tui.list.focused {
                tui.focus_composer(chats, &current_prefs);
            } else {
                tui.focus_sidebar(chats.state());
            }
            false
        }
        TuiEvent::ToggleDoubleClick => {
            prefs.update(UiPreferences::toggle_double_click_to_edit);
            false
        }
        TuiEvent::NewConversation => {
            tui.list.blur_all(chats, &current_prefs);
            let effect = chats.update(|s| update(s, Action::NewConversation));
            tui.list.focus_active(chats.state());
            run_effect(effect, chats, spawner)
        }
        TuiEvent::MouseClick(col, row) | TuiEvent::MouseDoubleClick(col, row) => {
            if tui.sidebar_contains(col, row) {
                if let Some(list_event) = tui.list.handle_event(&event, chats, &current_prefs) {
                    apply_list_event(list_event, tui, chats, &current_prefs);
                }
            } else {
                // Clicking outside the sidebar takes focus away from it
                tui.focus_composer(chats, &current_prefs);
            }
            false
        }
        TuiEvent::ScrollUp | TuiEvent::ScrollDown => {
            if tui.list.focused {
                tui.list.handle_event(&event, chats, &current_prefs);
            } else {
                tui.transcript.handle_event(&event);
            }
            false
        }
        _ if tui.list.focused => {
            if let Some(list_event) = tui.list.handle_event(&event, chats, &current_prefs) {
                apply_list_event(list_event, tui, chats, &current_prefs);
            }
            false
        }
        TuiEvent::Tab => {
            tui.focus_sidebar(chats.state());
            false
        }
        TuiEvent::Escape => {
            let effect = chats.update(|s| update(s, Action::CancelGeneration));
            run_effect(effect, chats, spawner)
        }
        _ => match tui.composer.handle_event(&event) {
            Some(EditorEvent::Submit(text)) => {
                let effect = chats.update(|s| update(s, Action::Submit(text)));
                tui.transcript.stick_to_bottom = true;
                run_effect(effect, chats, spawner)
            }
            _ => false,
        },
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut chats = Store::new(persistence::load_or_default());
    let mut prefs = Store::new(UiPreferences::from_config(&config));
    let mut tui = TuiState::new(&config);
    tui.list.focus_active(chats.state());

    // Store subscriptions only raise flags; the loop does the work
    let active_changed = Rc::new(Cell::new(false));
    let titles_changed = Rc::new(Cell::new(false));
    let double_click_changed: Rc<Cell<Option<bool>>> = Rc::new(Cell::new(None));
    {
        let flag = Rc::clone(&active_changed);
        chats.subscribe(|s| s.active_id().clone(), move |_| flag.set(true));
        let flag = Rc::clone(&titles_changed);
        chats.subscribe(
            |s| {
                s.conversations()
                    .iter()
                    .map(|c| (c.id.clone(), c.user_title.clone()))
                    .collect::<Vec<_>>()
            },
            move |_| flag.set(true),
        );
        let flag = Rc::clone(&double_click_changed);
        prefs.subscribe(|p| p.double_click_to_edit, move |on: &bool| flag.set(Some(*on)));
    }

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from responder tasks
    let (tx, rx) = mpsc::channel();
    let spawner = ReplySpawner {
        tx,
        delay: Duration::from_millis(config.reply_delay_ms),
    };

    let mut clicks = ClickTracker::default();
    let mut needs_redraw = true; // Force first frame

    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, chats.state(), &mut tui))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(Duration::from_millis(200), &mut clicks);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(|| poll_event_immediate(&mut clicks)))
        {
            if handle_event(event, &mut tui, &mut chats, &mut prefs, &spawner) {
                should_quit = true;
                break;
            }
        }

        if should_quit {
            break;
        }

        // Handle responder actions (streaming replies)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = chats.update(|s| update(s, action));
            run_effect(effect, &mut chats, &spawner);
        }

        if active_changed.take() {
            tui.transcript = TranscriptState::new();
            needs_redraw = true;
        }
        if titles_changed.take() {
            persistence::save_current(chats.state());
        }
        if let Some(on) = double_click_changed.take() {
            tui.status_message = format!(
                "Double-click to edit: {}",
                if on { "on" } else { "off" }
            );
            needs_redraw = true;
        }
    }

    // Save on exit
    persistence::save_current(chats.state());

    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{CliOverrides, ParleyConfig, resolve};
    use crate::test_support::test_store;

    fn setup(
        n: usize,
    ) -> (
        TuiState,
        Store<ChatState>,
        Vec<ConversationId>,
        mpsc::Receiver<Action>,
        ReplySpawner,
    ) {
        let config = resolve(&ParleyConfig::default(), &CliOverrides::default());
        let mut tui = TuiState::new(&config);
        let (chats, ids) = test_store(n);
        tui.list.focus_active(chats.state());
        let (tx, rx) = mpsc::channel();
        let spawner = ReplySpawner {
            tx,
            delay: Duration::from_millis(1),
        };
        (tui, chats, ids, rx, spawner)
    }

    fn type_str(
        text: &str,
        tui: &mut TuiState,
        chats: &mut Store<ChatState>,
        prefs: &mut Store<UiPreferences>,
        spawner: &ReplySpawner,
    ) {
        for c in text.chars() {
            handle_event(TuiEvent::InputChar(c), tui, chats, prefs, spawner);
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_submit_spawns_reply_and_marks_generating() {
        let (mut tui, mut chats, ids, rx, spawner) = setup(2);
        let mut prefs = Store::new(UiPreferences::default());

        type_str("hi", &mut tui, &mut chats, &mut prefs, &spawner);
        handle_event(TuiEvent::Submit, &mut tui, &mut chats, &mut prefs, &spawner);
        assert!(chats.state().is_generating(&ids[0]));

        // Drain the responder into the store; it runs on a worker thread
        loop {
            let action = rx.recv_timeout(Duration::from_secs(2)).unwrap();
            let done = matches!(action, Action::ReplyDone { .. });
            chats.update(|s| update(s, action));
            if done {
                break;
            }
        }
        assert!(!chats.state().is_generating(&ids[0]));
        let messages = &chats.state().conversation(&ids[0]).unwrap().messages;
        assert_eq!(messages.last().unwrap().text, "[Default] You said: hi");
    }

    #[test]
    fn test_ctrl_o_toggles_sidebar_focus() {
        let (mut tui, mut chats, _, _rx, spawner) = setup(2);
        let mut prefs = Store::new(UiPreferences::default());

        handle_event(TuiEvent::ToggleSidebar, &mut tui, &mut chats, &mut prefs, &spawner);
        assert!(tui.list.focused);
        handle_event(TuiEvent::ToggleSidebar, &mut tui, &mut chats, &mut prefs, &spawner);
        assert!(!tui.list.focused);
    }

    #[test]
    fn test_keys_go_to_sidebar_while_focused() {
        let (mut tui, mut chats, ids, _rx, spawner) = setup(2);
        let mut prefs = Store::new(UiPreferences::default());

        handle_event(TuiEvent::Tab, &mut tui, &mut chats, &mut prefs, &spawner);
        handle_event(TuiEvent::CursorDown, &mut tui, &mut chats, &mut prefs, &spawner);
        handle_event(TuiEvent::Submit, &mut tui, &mut chats, &mut prefs, &spawner);
        assert_eq!(chats.state().active_id(), &ids[1]);
        assert!(tui.composer.buffer.is_empty());
    }

    #[test]
    fn test_toggle_double_click_flips_preference() {
        let (mut tui, mut chats, _, _rx, spawner) = setup(1);
        let mut prefs = Store::new(UiPreferences::default());

        handle_event(TuiEvent::ToggleDoubleClick, &mut tui, &mut chats, &mut prefs, &spawner);
        assert!(!prefs.state().double_click_to_edit);
    }

    #[test]
    fn test_click_outside_sidebar_returns_focus_to_composer() {
        let (mut tui, mut chats, _, _rx, spawner) = setup(2);
        let mut prefs = Store::new(UiPreferences::default());
        tui.sidebar_area = Some(Rect::new(0, 1, 10, 10));

        handle_event(TuiEvent::Tab, &mut tui, &mut chats, &mut prefs, &spawner);
        assert!(tui.list.focused);
        handle_event(TuiEvent::MouseClick(50, 5), &mut tui, &mut chats, &mut prefs, &spawner);
        assert!(!tui.list.focused);
    }
}
