// =====
// TESTS: 7
// =====
//
// Backward-pagination integration tests: ordering, dedup, the history
// lower bound, and failure tolerance.

use coachdesk::api::types::{ConversationId, MessageId};
use coachdesk::app::NetEvent;
use coachdesk::chat::{FeedPhase, ScrollAnchor};
use pretty_assertions::assert_eq;

use crate::helpers::{conversation, feed_ids, load_list, messages, open_with_messages, send_net_event, test_app};

fn anchor(id: u64) -> ScrollAnchor {
    ScrollAnchor { message_id: MessageId(id), offset: 0 }
}

// --- Ordering and dedup (P1/P3) ---

#[tokio::test]
async fn older_merges_keep_the_id_list_strictly_increasing() {
    let mut app = test_app();
    load_list(&mut app, vec![conversation("c", "u-1", 1, true)]);
    open_with_messages(&mut app, "c", messages("c", 50..=60));

    // Two successive backward pages
    assert_eq!(app.feed.request_older(), Some(MessageId(50)));
    send_net_event(
        &mut app,
        NetEvent::OlderLoaded {
            conversation_id: ConversationId::from("c"),
            messages: messages("c", 40..=49),
            anchor: anchor(50),
        },
    );
    assert_eq!(app.feed.request_older(), Some(MessageId(40)));
    send_net_event(
        &mut app,
        NetEvent::OlderLoaded {
            conversation_id: ConversationId::from("c"),
            messages: messages("c", 30..=39),
            anchor: anchor(40),
        },
    );

    let ids = feed_ids(&app);
    let expected: Vec<u64> = (30..=60).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn overlapping_page_changes_nothing_for_the_overlap() {
    let mut app = test_app();
    load_list(&mut app, vec![conversation("c", "u-1", 1, true)]);
    open_with_messages(&mut app, "c", messages("c", 50..=60));

    app.feed.request_older();
    // Page overlaps the cached range by 45..=50
    send_net_event(
        &mut app,
        NetEvent::OlderLoaded {
            conversation_id: ConversationId::from("c"),
            messages: messages("c", 45..=52),
            anchor: anchor(50),
        },
    );

    let expected: Vec<u64> = (45..=60).collect();
    assert_eq!(feed_ids(&app), expected, "overlapping ids merged without duplication");
}

// --- Lower bound (P2) ---

#[tokio::test]
async fn no_fetch_once_the_cached_minimum_reaches_first_message_id() {
    let mut app = test_app();
    load_list(&mut app, vec![conversation("c", "u-1", 40, true)]);
    open_with_messages(&mut app, "c", messages("c", 50..=60));

    assert_eq!(app.feed.request_older(), Some(MessageId(50)));
    send_net_event(
        &mut app,
        NetEvent::OlderLoaded {
            conversation_id: ConversationId::from("c"),
            messages: messages("c", 40..=49),
            anchor: anchor(50),
        },
    );

    // min id == first_message_id — history is complete
    assert_eq!(app.feed.min_id(), Some(MessageId(40)));
    assert!(!app.feed.has_more_history());
    assert_eq!(app.feed.request_older(), None);
}

#[tokio::test]
async fn scenario_first_message_id_one_with_cache_50_to_60() {
    let mut app = test_app();
    load_list(&mut app, vec![conversation("c", "u-1", 1, true)]);
    open_with_messages(&mut app, "c", messages("c", 50..=60));

    // Scrolling to the top fetches ids < 50; [40..49] merges to [40..60]
    let before = app.feed.request_older().unwrap();
    assert_eq!(before, MessageId(50));
    send_net_event(
        &mut app,
        NetEvent::OlderLoaded {
            conversation_id: ConversationId::from("c"),
            messages: messages("c", 40..=49),
            anchor: anchor(50),
        },
    );

    let expected: Vec<u64> = (40..=60).collect();
    assert_eq!(feed_ids(&app), expected);
    assert!(app.feed.has_more_history(), "first_message_id=1 means more history remains");
}

// --- Serialization and failure ---

#[tokio::test]
async fn backward_fetches_are_serialized_by_the_phase_guard() {
    let mut app = test_app();
    load_list(&mut app, vec![conversation("c", "u-1", 1, true)]);
    open_with_messages(&mut app, "c", messages("c", 50..=60));

    assert_eq!(app.feed.request_older(), Some(MessageId(50)));
    assert_eq!(app.feed.phase(), FeedPhase::LoadingOlder);
    assert_eq!(app.feed.request_older(), None, "overlapping backward fetch rejected");
}

#[tokio::test]
async fn failed_backward_fetch_keeps_the_cache_and_reopens_retry() {
    let mut app = test_app();
    load_list(&mut app, vec![conversation("c", "u-1", 1, true)]);
    open_with_messages(&mut app, "c", messages("c", 50..=60));

    app.feed.request_older();
    send_net_event(
        &mut app,
        NetEvent::OlderFailed {
            conversation_id: ConversationId::from("c"),
            error: "Could not reach the server.".to_owned(),
        },
    );

    assert_eq!(app.feed.phase(), FeedPhase::Ready);
    assert_eq!(app.feed.messages().len(), 11, "cache untouched");
    assert!(app.toast.is_some());
    assert_eq!(app.feed.request_older(), Some(MessageId(50)), "retry path open");
}

#[tokio::test]
async fn older_merge_does_not_pin_the_view_to_the_bottom() {
    let mut app = test_app();
    load_list(&mut app, vec![conversation("c", "u-1", 1, true)]);
    open_with_messages(&mut app, "c", messages("c", 50..=60));

    // Operator has scrolled up; bottom pinning is off
    app.scroll.stick_to_bottom = false;
    app.scroll.top = 2;

    app.feed.request_older();
    send_net_event(
        &mut app,
        NetEvent::OlderLoaded {
            conversation_id: ConversationId::from("c"),
            messages: messages("c", 40..=49),
            anchor: anchor(50),
        },
    );

    assert!(!app.scroll.stick_to_bottom, "backward merges never auto-scroll to bottom");
    assert_eq!(app.scroll.pending_anchor, Some(anchor(50)), "anchor queued for restore");
}
