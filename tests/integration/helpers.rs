use chrono::{TimeZone, Utc};
use coachdesk::api::types::{
    Conversation, ConversationId, ConversationPage, Message, MessageBody, MessageId, UserId,
};
use coachdesk::app::{App, NetEvent};

/// Build a minimal `App` for integration testing.
/// No API client, no TUI -- just state.
pub fn test_app() -> App {
    App::test_default()
}

/// Helper: apply a network completion to the app's event pipeline.
pub fn send_net_event(app: &mut App, event: NetEvent) {
    coachdesk::app::handle_net_event(app, event);
}

pub fn conversation(id: &str, user: &str, first_id: u64, seen: bool) -> Conversation {
    Conversation {
        id: ConversationId::from(id),
        user_id: UserId::from(user),
        first_message_id: MessageId(first_id),
        last_message: None,
        seen,
    }
}

pub fn text_message(conversation_id: &str, id: u64) -> Message {
    Message {
        id: MessageId(id),
        conversation_id: ConversationId::from(conversation_id),
        from_admin_id: None,
        body: MessageBody::Text { content: format!("message {id}") },
        date: Utc.with_ymd_and_hms(2026, 3, 5, 10, 0, 0).unwrap(),
    }
}

pub fn staff_message(conversation_id: &str, id: u64, content: &str) -> Message {
    Message {
        id: MessageId(id),
        conversation_id: ConversationId::from(conversation_id),
        from_admin_id: Some("staff-1".to_owned()),
        body: MessageBody::Text { content: content.to_owned() },
        date: Utc.with_ymd_and_hms(2026, 3, 5, 10, 0, 0).unwrap(),
    }
}

pub fn messages(conversation_id: &str, ids: std::ops::RangeInclusive<u64>) -> Vec<Message> {
    ids.map(|id| text_message(conversation_id, id)).collect()
}

pub fn page(conversations: Vec<Conversation>, has_more: bool, total: u64) -> ConversationPage {
    ConversationPage { conversations, has_more, total }
}

/// Load a replace-page of conversations into the app under the current
/// search generation.
pub fn load_list(app: &mut App, conversations: Vec<Conversation>) {
    let generation = app.conversations.generation();
    let total = conversations.len() as u64;
    send_net_event(
        app,
        NetEvent::ConversationsLoaded {
            generation,
            append: false,
            page: page(conversations, false, total),
        },
    );
}

/// Select a conversation and complete its initial feed load in one step.
pub fn open_with_messages(app: &mut App, id: &str, msgs: Vec<Message>) {
    coachdesk::app::select_conversation(app, ConversationId::from(id));
    send_net_event(
        app,
        NetEvent::FeedLoaded { conversation_id: ConversationId::from(id), messages: msgs },
    );
}

pub fn feed_ids(app: &App) -> Vec<u64> {
    app.feed.messages().iter().map(|m| m.id.0).collect()
}
