// =====
// TESTS: 4
// =====
//
// Stale-response guards: late completions whose originating context no
// longer matches current state are dropped silently.

use coachdesk::api::types::{ConversationId, MessageId};
use coachdesk::app::NetEvent;
use coachdesk::chat::{FeedPhase, ScrollAnchor};
use pretty_assertions::assert_eq;

use crate::helpers::{conversation, feed_ids, load_list, messages, open_with_messages, send_net_event, test_app};

#[tokio::test]
async fn late_initial_page_for_a_deselected_conversation_is_dropped() {
    let mut app = test_app();
    load_list(
        &mut app,
        vec![conversation("a", "u-1", 1, true), conversation("b", "u-2", 1, true)],
    );

    // A selected, fetch in flight...
    coachdesk::app::select_conversation(&mut app, ConversationId::from("a"));
    // ...then B selected before A's response resolves
    coachdesk::app::select_conversation(&mut app, ConversationId::from("b"));

    send_net_event(
        &mut app,
        NetEvent::FeedLoaded {
            conversation_id: ConversationId::from("a"),
            messages: messages("a", 1..=5),
        },
    );

    // A's late response must not mutate B's displayed feed
    assert_eq!(app.feed.conversation_id(), Some(&ConversationId::from("b")));
    assert!(app.feed.messages().is_empty());
    assert_eq!(app.feed.phase(), FeedPhase::LoadingInitial);

    // B's own response applies normally afterwards
    send_net_event(
        &mut app,
        NetEvent::FeedLoaded {
            conversation_id: ConversationId::from("b"),
            messages: messages("b", 10..=12),
        },
    );
    assert_eq!(feed_ids(&app), vec![10, 11, 12]);
}

#[tokio::test]
async fn late_older_page_for_a_deselected_conversation_is_dropped() {
    let mut app = test_app();
    load_list(
        &mut app,
        vec![conversation("a", "u-1", 1, true), conversation("b", "u-2", 1, true)],
    );
    open_with_messages(&mut app, "a", messages("a", 50..=60));

    // Backward fetch issued for A, then the selection moves to B
    app.feed.request_older();
    coachdesk::app::select_conversation(&mut app, ConversationId::from("b"));
    send_net_event(
        &mut app,
        NetEvent::FeedLoaded {
            conversation_id: ConversationId::from("b"),
            messages: messages("b", 20..=25),
        },
    );

    send_net_event(
        &mut app,
        NetEvent::OlderLoaded {
            conversation_id: ConversationId::from("a"),
            messages: messages("a", 40..=49),
            anchor: ScrollAnchor { message_id: MessageId(50), offset: 0 },
        },
    );

    assert_eq!(feed_ids(&app), vec![20, 21, 22, 23, 24, 25], "B's feed untouched");
    assert_eq!(app.scroll.pending_anchor, None, "no anchor restore for a dropped page");
}

#[tokio::test]
async fn late_failure_for_a_deselected_conversation_is_silent() {
    let mut app = test_app();
    load_list(
        &mut app,
        vec![conversation("a", "u-1", 1, true), conversation("b", "u-2", 1, true)],
    );
    coachdesk::app::select_conversation(&mut app, ConversationId::from("a"));
    coachdesk::app::select_conversation(&mut app, ConversationId::from("b"));

    send_net_event(
        &mut app,
        NetEvent::FeedFailed {
            conversation_id: ConversationId::from("a"),
            error: "Could not reach the server.".to_owned(),
        },
    );

    // An internal consistency guard, not a user-facing error
    assert!(app.toast.is_none());
    assert_eq!(app.feed.phase(), FeedPhase::LoadingInitial, "B's load still pending");
}

#[tokio::test]
async fn send_completion_after_a_conversation_switch_still_merges_by_id() {
    let mut app = test_app();
    load_list(
        &mut app,
        vec![conversation("a", "u-1", 1, true), conversation("b", "u-2", 1, true)],
    );
    open_with_messages(&mut app, "a", messages("a", 1..=3));

    coachdesk::app::submit_text(&mut app, "hello");
    let local_id = app.outbox.entries()[0].local_id;

    // Switch away before the send resolves: the outbox clears, but the
    // completion for A must not leak into B's feed.
    coachdesk::app::select_conversation(&mut app, ConversationId::from("b"));
    send_net_event(
        &mut app,
        NetEvent::SendSucceeded {
            local_id,
            outcome: coachdesk::api::types::SendOutcome {
                message: crate::helpers::staff_message("a", 4, "hello"),
                conversation: None,
            },
        },
    );

    assert!(app.feed.messages().is_empty(), "B's (still loading) feed unaffected");
}
