// =====
// TESTS: 9
// =====
//
// Conversation list integration tests: search debounce, append merging,
// seen idempotence, selection handoff.

use coachdesk::api::types::ConversationId;
use coachdesk::app::NetEvent;
use coachdesk::chat::FeedPhase;
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};

use crate::helpers::{
    conversation, load_list, messages, open_with_messages, page, send_net_event, test_app,
};

// --- Search debounce ---

#[tokio::test]
async fn search_typed_then_cleared_fires_once_for_the_final_term() {
    let mut app = test_app();
    let t0 = Instant::now();

    // "mario" typed, then cleared 300ms later — inside the 700ms window
    app.conversations.set_search("mario".to_owned(), t0);
    app.conversations.set_search(String::new(), t0 + Duration::from_millis(300));

    // Nothing fires before the (re-armed) deadline
    assert!(!app.conversations.debounce.fire_if_due(t0 + Duration::from_millis(699)));
    assert!(!app.conversations.debounce.fire_if_due(t0 + Duration::from_millis(999)));

    // Exactly one firing, for the empty string, at page 1
    assert!(app.conversations.debounce.fire_if_due(t0 + Duration::from_millis(1000)));
    assert!(!app.conversations.debounce.fire_if_due(t0 + Duration::from_millis(2000)));
    assert_eq!(app.conversations.search(), "");
    assert_eq!(app.conversations.cursor.page(), 1);
}

#[tokio::test]
async fn search_change_resets_the_cursor_before_the_fetch_fires() {
    let mut app = test_app();
    let generation = app.conversations.generation();
    send_net_event(
        &mut app,
        NetEvent::ConversationsLoaded {
            generation,
            append: false,
            page: page(vec![conversation("a", "u-1", 1, true)], true, 40),
        },
    );
    app.conversations.cursor.advance();
    assert_eq!(app.conversations.cursor.page(), 2);

    app.conversations.set_search("anna".to_owned(), Instant::now());
    // Reset happens at schedule time, never at fire time
    assert_eq!(app.conversations.cursor.page(), 1);
    assert!(app.conversations.debounce.is_armed());
}

// --- Append merging ---

#[tokio::test]
async fn overlapping_append_pages_never_duplicate_ids() {
    let mut app = test_app();
    load_list(&mut app, vec![conversation("a", "u-1", 1, true), conversation("b", "u-2", 1, true)]);

    let generation = app.conversations.generation();
    // Two overlapping "load more" responses resolve back to back
    send_net_event(
        &mut app,
        NetEvent::ConversationsLoaded {
            generation,
            append: true,
            page: page(vec![conversation("b", "u-2", 1, true), conversation("c", "u-3", 1, true)], true, 4),
        },
    );
    send_net_event(
        &mut app,
        NetEvent::ConversationsLoaded {
            generation,
            append: true,
            page: page(vec![conversation("c", "u-3", 1, true), conversation("d", "u-4", 1, true)], false, 4),
        },
    );

    let ids: Vec<&str> =
        app.conversations.conversations().iter().map(|c| c.id.0.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d"]);
}

#[tokio::test]
async fn failed_fetch_preserves_the_previous_collection() {
    let mut app = test_app();
    load_list(&mut app, vec![conversation("a", "u-1", 1, true)]);
    app.conversations.loading = true;

    let generation = app.conversations.generation();
    send_net_event(
        &mut app,
        NetEvent::ConversationsFailed { generation, error: "Could not reach the server.".to_owned() },
    );

    assert!(!app.conversations.loading, "loading flag cleared so retry is possible");
    assert_eq!(app.conversations.conversations().len(), 1, "prior data intact");
    assert!(app.toast.is_some(), "failure surfaced as a toast");
}

#[tokio::test]
async fn stale_generation_page_does_not_clobber_the_new_search() {
    let mut app = test_app();
    let old_generation = app.conversations.generation();

    // Search changes while the old fetch is still in flight
    app.conversations.set_search("anna".to_owned(), Instant::now());
    load_list(&mut app, vec![conversation("anna-1", "anna", 1, true)]);

    send_net_event(
        &mut app,
        NetEvent::ConversationsLoaded {
            generation: old_generation,
            append: false,
            page: page(vec![conversation("stale", "u-9", 1, true)], false, 1),
        },
    );

    let ids: Vec<&str> =
        app.conversations.conversations().iter().map(|c| c.id.0.as_str()).collect();
    assert_eq!(ids, vec!["anna-1"], "late response for the old term dropped");
}

// --- Seen idempotence ---

#[tokio::test]
async fn selecting_an_unseen_conversation_marks_seen_exactly_once() {
    let mut app = test_app();
    load_list(&mut app, vec![conversation("a", "u-1", 1, false)]);

    coachdesk::app::select_conversation(&mut app, ConversationId::from("a"));
    assert!(app.conversations.get(&ConversationId::from("a")).unwrap().seen);

    // Reapplying the transition is a no-op: no second network side effect
    assert!(!app.conversations.mark_seen_local(&ConversationId::from("a")));
}

#[tokio::test]
async fn selecting_a_seen_conversation_does_not_retransition() {
    let mut app = test_app();
    load_list(&mut app, vec![conversation("a", "u-1", 1, true)]);

    // Already seen: the local transition reports false, so no ack is issued
    assert!(!app.conversations.mark_seen_local(&ConversationId::from("a")));
    coachdesk::app::select_conversation(&mut app, ConversationId::from("a"));
    assert!(app.conversations.get(&ConversationId::from("a")).unwrap().seen);
}

// --- Selection handoff ---

#[tokio::test]
async fn reselecting_the_active_conversation_is_a_noop() {
    let mut app = test_app();
    load_list(&mut app, vec![conversation("a", "u-1", 1, true)]);
    open_with_messages(&mut app, "a", messages("a", 50..=60));
    assert_eq!(app.feed.phase(), FeedPhase::Ready);

    // Selecting the same id again must not discard the cache or refetch
    coachdesk::app::select_conversation(&mut app, ConversationId::from("a"));
    assert_eq!(app.feed.phase(), FeedPhase::Ready);
    assert_eq!(app.feed.messages().len(), 11);
}

#[tokio::test]
async fn selecting_a_different_conversation_restarts_the_feed() {
    let mut app = test_app();
    load_list(
        &mut app,
        vec![conversation("a", "u-1", 1, true), conversation("b", "u-2", 1, true)],
    );
    open_with_messages(&mut app, "a", messages("a", 50..=60));

    coachdesk::app::select_conversation(&mut app, ConversationId::from("b"));
    assert_eq!(app.feed.phase(), FeedPhase::LoadingInitial);
    assert!(app.feed.messages().is_empty(), "previous conversation's cache discarded");
    assert!(app.scroll.stick_to_bottom, "fresh selection pins to the bottom");
}
