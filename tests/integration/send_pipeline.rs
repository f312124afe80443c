// =====
// TESTS: 7
// =====
//
// Send pipeline integration tests: optimistic lifecycle, overlapping sends,
// failure visibility, and the conversation-not-found recovery flow.

use coachdesk::api::types::{ConversationId, SendOutcome, SendTarget, UserId};
use coachdesk::app::{DialogFlow, NetEvent, Pane};
use coachdesk::chat::{FeedPhase, OutboxState};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;

use crate::helpers::{
    conversation, feed_ids, load_list, messages, open_with_messages, send_net_event,
    staff_message, test_app,
};

fn key(app: &mut coachdesk::app::App, code: KeyCode) {
    coachdesk::app::handle_terminal_event(
        app,
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE)),
    );
}

// --- Optimistic text send lifecycle (scenario 3) ---

#[tokio::test]
async fn text_send_is_optimistic_then_reconciled_with_the_server_id() {
    let mut app = test_app();
    load_list(&mut app, vec![conversation("c", "u-1", 1, true)]);
    open_with_messages(&mut app, "c", messages("c", 50..=60));
    app.scroll.stick_to_bottom = false;

    assert!(coachdesk::app::submit_text(&mut app, "Hello"));
    assert!(app.outbox.is_sending(), "Sending became true");
    assert_eq!(app.outbox.entries().len(), 1, "optimistic entry at the bottom");
    assert!(app.scroll.stick_to_bottom, "view scrolls to bottom on submit");

    let local_id = app.outbox.entries()[0].local_id;
    send_net_event(
        &mut app,
        NetEvent::SendSucceeded {
            local_id,
            outcome: SendOutcome { message: staff_message("c", 61, "Hello"), conversation: None },
        },
    );

    assert!(!app.outbox.is_sending(), "Sending back to false");
    assert!(app.outbox.is_empty(), "optimistic entry reconciled away");
    assert_eq!(app.feed.messages().last().unwrap().id.0, 61, "server id in the feed");
    assert!(app.scroll.stick_to_bottom);
}

#[tokio::test]
async fn send_reconcile_is_idempotent_with_a_concurrent_refresh() {
    let mut app = test_app();
    load_list(&mut app, vec![conversation("c", "u-1", 1, true)]);
    open_with_messages(&mut app, "c", messages("c", 50..=60));

    assert!(coachdesk::app::submit_text(&mut app, "Hello"));
    let local_id = app.outbox.entries()[0].local_id;

    // A refresh already delivered the message before the send resolved
    app.feed.merge_message(staff_message("c", 61, "Hello"));

    send_net_event(
        &mut app,
        NetEvent::SendSucceeded {
            local_id,
            outcome: SendOutcome { message: staff_message("c", 61, "Hello"), conversation: None },
        },
    );

    let expected: Vec<u64> = (50..=61).collect();
    assert_eq!(feed_ids(&app), expected, "no duplicate for the overlapping id");
}

#[tokio::test]
async fn overlapping_sends_never_lose_the_earlier_optimistic_entry() {
    let mut app = test_app();
    load_list(&mut app, vec![conversation("c", "u-1", 1, true)]);
    open_with_messages(&mut app, "c", messages("c", 1..=3));

    assert!(coachdesk::app::submit_text(&mut app, "first"));
    assert!(coachdesk::app::submit_text(&mut app, "second"));
    assert_eq!(app.outbox.entries().len(), 2);

    // The second resolves first; the first entry must survive
    let second_id = app.outbox.entries()[1].local_id;
    send_net_event(
        &mut app,
        NetEvent::SendSucceeded {
            local_id: second_id,
            outcome: SendOutcome { message: staff_message("c", 5, "second"), conversation: None },
        },
    );

    assert_eq!(app.outbox.entries().len(), 1);
    assert!(app.outbox.is_sending(), "first send still in flight");
}

#[tokio::test]
async fn failed_send_stays_visible_and_distinct_from_sent() {
    let mut app = test_app();
    load_list(&mut app, vec![conversation("c", "u-1", 1, true)]);
    open_with_messages(&mut app, "c", messages("c", 1..=3));

    assert!(coachdesk::app::submit_text(&mut app, "did this land?"));
    let local_id = app.outbox.entries()[0].local_id;
    send_net_event(
        &mut app,
        NetEvent::SendFailed { local_id, error: "The server rejected the request (HTTP 500).".to_owned() },
    );

    assert_eq!(app.outbox.entries()[0].state, OutboxState::Failed, "not silently kept as sent");
    assert!(app.toast.is_some(), "failure surfaced as a toast");
    assert_eq!(feed_ids(&app), vec![1, 2, 3], "no phantom message in the feed");
    assert!(app.scroll.stick_to_bottom, "sending true→false re-pins the bottom");
}

#[tokio::test]
async fn send_without_a_selection_is_refused_with_a_hint() {
    let mut app = test_app();
    assert!(!coachdesk::app::submit_text(&mut app, "hello?"));
    assert!(app.outbox.is_empty());
    assert!(app.toast.is_some());
}

// --- Conversation-not-found recovery (scenario 4) ---

#[tokio::test]
async fn deep_link_without_a_thread_walks_confirm_then_compose_then_create() {
    let mut app = test_app();
    load_list(&mut app, vec![conversation("other", "u-9", 1, true)]);

    // Deep link to a client with no existing conversation
    send_net_event(&mut app, NetEvent::DeepLinkNotFound { user_id: UserId::from("42") });
    assert!(matches!(app.dialog, Some(DialogFlow::ConfirmStart { .. })));
    assert_eq!(app.conversations.selected(), None, "selection yields null");

    // Confirm → compose
    key(&mut app, KeyCode::Enter);
    assert!(matches!(app.dialog, Some(DialogFlow::ComposeFirst { .. })));

    // Type the first message and send it
    for c in "Welcome!".chars() {
        key(&mut app, KeyCode::Char(c));
    }
    key(&mut app, KeyCode::Enter);
    assert!(app.dialog.is_none(), "dialog closes on send");
    assert_eq!(app.outbox.entries().len(), 1);
    assert_eq!(app.outbox.entries()[0].target, SendTarget::User(UserId::from("42")));

    // The backend creates conversation C1 as a side effect
    let local_id = app.outbox.entries()[0].local_id;
    send_net_event(
        &mut app,
        NetEvent::SendSucceeded {
            local_id,
            outcome: SendOutcome {
                message: staff_message("C1", 1, "Welcome!"),
                conversation: Some(conversation("C1", "42", 1, true)),
            },
        },
    );

    // The list gains C1 at the top without a reload, and it is open
    assert_eq!(app.conversations.conversations()[0].id, ConversationId::from("C1"));
    assert_eq!(app.conversations.selected(), Some(&ConversationId::from("C1")));
    assert_eq!(app.feed.phase(), FeedPhase::Ready);
    assert_eq!(feed_ids(&app), vec![1]);
    assert_eq!(app.focus, Pane::Compose);
}

#[tokio::test]
async fn declining_the_not_found_dialog_returns_to_the_empty_state() {
    let mut app = test_app();
    send_net_event(&mut app, NetEvent::DeepLinkNotFound { user_id: UserId::from("42") });

    key(&mut app, KeyCode::Esc);
    assert!(app.dialog.is_none());
    assert_eq!(app.conversations.selected(), None);
    assert!(app.feed.conversation_id().is_none());
    assert!(app.outbox.is_empty(), "nothing was sent");
}
