use parley::core::chats::ChatState;
use parley::core::conversation::{ConversationId, Message, Role};
use parley::core::preferences::UiPreferences;
use parley::core::purpose::DEFAULT_PURPOSE_ID;
use parley::core::store::Store;
use parley::tui::component::Component;
use parley::tui::components::{ConversationList, ConversationListState};
use parley::tui::event::TuiEvent;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

// ============================================================================
// Helper Functions
// ============================================================================

/// Three conversations with one message each; the top one is active.
fn three_conversations() -> (Store<ChatState>, Vec<ConversationId>) {
    let mut state = ChatState::new();
    state.create_conversation(DEFAULT_PURPOSE_ID);
    state.create_conversation(DEFAULT_PURPOSE_ID);
    let ids: Vec<ConversationId> = state.conversations().iter().map(|c| c.id.clone()).collect();
    for (i, id) in ids.iter().enumerate() {
        state.append_message(id, Message::new(Role::User, format!("Chat {i}")));
    }
    state.set_active(&ids[0]);
    (Store::new(state), ids)
}

/// Renders the sidebar so rows record their hit-test regions.
fn render(list: &mut ConversationListState, chats: &Store<ChatState>) -> String {
    let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
    terminal
        .draw(|f| ConversationList::new(list, chats.state()).render(f, f.area()))
        .unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}

fn center(rect: Rect) -> (u16, u16) {
    (rect.x + rect.width / 2, rect.y)
}

// ============================================================================
// Mouse flows
// ============================================================================

#[test]
fn test_two_step_delete_with_mouse() {
    let (mut chats, ids) = three_conversations();
    let prefs = UiPreferences::default();
    let mut list = ConversationListState::new(0, true);

    render(&mut list, &chats);
    let trigger = list.row(&ids[0]).unwrap().regions().trigger.unwrap();
    let (col, row) = center(trigger);
    list.handle_event(&TuiEvent::MouseClick(col, row), &mut chats, &prefs);
    assert!(list.row(&ids[0]).unwrap().is_delete_armed());

    let text = render(&mut list, &chats);
    assert!(text.contains("[delete]"));
    assert!(text.contains("[cancel]"));

    let confirm = list.row(&ids[0]).unwrap().regions().confirm.unwrap();
    let (col, row) = center(confirm);
    list.handle_event(&TuiEvent::MouseClick(col, row), &mut chats, &prefs);

    assert_eq!(chats.state().len(), 2);
    assert!(chats.state().conversation(&ids[0]).is_none());
    assert_eq!(chats.state().active_id(), &ids[1]);
}

#[test]
fn test_trigger_on_inactive_row_only_selects_it() {
    let (mut chats, ids) = three_conversations();
    let prefs = UiPreferences::default();
    let mut list = ConversationListState::new(0, true);

    render(&mut list, &chats);
    let trigger = list.row(&ids[2]).unwrap().regions().trigger.unwrap();
    let (col, row) = center(trigger);
    list.handle_event(&TuiEvent::MouseClick(col, row), &mut chats, &prefs);

    assert_eq!(chats.state().active_id(), &ids[2]);
    assert!(!list.row(&ids[2]).unwrap().is_delete_armed());
    assert_eq!(chats.state().len(), 3);
}

#[test]
fn test_rename_with_double_click_then_enter() {
    let (mut chats, ids) = three_conversations();
    let prefs = UiPreferences::default();
    let mut list = ConversationListState::new(0, true);
    list.focused = true;

    render(&mut list, &chats);
    let title = list.row(&ids[0]).unwrap().regions().title;
    list.handle_event(&TuiEvent::MouseDoubleClick(title.x, title.y), &mut chats, &prefs);
    assert!(list.row(&ids[0]).unwrap().is_editing_title());

    list.handle_event(&TuiEvent::CursorEnd, &mut chats, &prefs);
    for c in "!".chars() {
        list.handle_event(&TuiEvent::InputChar(c), &mut chats, &prefs);
    }
    list.handle_event(&TuiEvent::Submit, &mut chats, &prefs);

    let conversation = chats.state().conversation(&ids[0]).unwrap();
    assert_eq!(conversation.user_title, "Chat 0!");
    assert!(render(&mut list, &chats).contains("Chat 0!"));
}

#[test]
fn test_double_click_does_nothing_when_preference_off() {
    let (mut chats, ids) = three_conversations();
    let prefs = UiPreferences {
        double_click_to_edit: false,
    };
    let mut list = ConversationListState::new(0, true);

    render(&mut list, &chats);
    let title = list.row(&ids[1]).unwrap().regions().title;
    list.handle_event(&TuiEvent::MouseDoubleClick(title.x, title.y), &mut chats, &prefs);

    assert!(!list.row(&ids[1]).unwrap().is_editing_title());
    // Still a click on the row
    assert_eq!(chats.state().active_id(), &ids[1]);
}

// ============================================================================
// Lonely conversation
// ============================================================================

#[test]
fn test_last_conversation_has_no_delete_controls() {
    let mut chats = Store::new(ChatState::new());
    let only = chats.state().active_id().clone();
    let prefs = UiPreferences::default();
    let mut list = ConversationListState::new(0, true);
    list.focused = true;

    let text = render(&mut list, &chats);
    assert!(!text.contains("[x]"));
    assert_eq!(list.row(&only).unwrap().regions().trigger, None);

    list.handle_event(&TuiEvent::InputChar('d'), &mut chats, &prefs);
    assert!(!list.row(&only).unwrap().is_delete_armed());
    assert_eq!(chats.state().len(), 1);
}

// ============================================================================
// Store subscription
// ============================================================================

#[test]
fn test_activation_notifies_subscribers_once() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let (mut chats, ids) = three_conversations();
    let prefs = UiPreferences::default();
    let mut list = ConversationListState::new(0, true);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    chats.subscribe(
        |s| s.active_id().clone(),
        move |id: &ConversationId| sink.borrow_mut().push(id.clone()),
    );

    render(&mut list, &chats);
    let row = list.row(&ids[1]).unwrap().regions().row;
    list.handle_event(&TuiEvent::MouseClick(row.x, row.y), &mut chats, &prefs);
    // Clicking the already active row is not a change
    list.handle_event(&TuiEvent::MouseClick(row.x, row.y), &mut chats, &prefs);

    assert_eq!(*seen.borrow(), vec![ids[1].clone()]);
}
