// coachdesk — a terminal messaging console for the CoachDesk platform
// Copyright (C) 2025  CoachDesk contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Network tasks. Each spawns on the LocalSet, performs one API call, and
//! posts a `NetEvent` back to the loop — no state is mutated from inside a
//! task. Without an API client (tests) the synchronous bookkeeping still
//! happens and the network part is skipped.

use crate::api::types::{
    ConversationId, FileRef, MessageBody, SendTarget, UserId,
};
use crate::app::events::NetEvent;
use crate::app::state::App;
use crate::error::ApiError;
use std::path::{Path, PathBuf};

/// Fetch the current `{search, page, pageSize}` window of the conversation
/// list. `append = true` grows the list by the next page; `false` replaces
/// it (initial load and post-debounce search).
pub fn load_conversations(app: &mut App, append: bool) {
    if append {
        // One page-grow at a time; the merge is id-deduplicated anyway, so
        // even a racing pair of appends cannot duplicate a conversation.
        if app.conversations.loading || !app.conversations.cursor.advance() {
            return;
        }
    }
    app.conversations.loading = true;

    let Some(api) = app.api.clone() else { return };
    let generation = app.conversations.generation();
    let search = app.conversations.search().to_owned();
    let page = app.conversations.cursor.page();
    let page_size = app.conversations.cursor.page_size();
    let tx = app.event_tx.clone();

    tokio::task::spawn_local(async move {
        match api.list_conversations(&search, page, page_size).await {
            Ok(response) => {
                let _ = tx.send(NetEvent::ConversationsLoaded { generation, append, page: response });
            }
            Err(err) => {
                let _ = tx.send(NetEvent::ConversationsFailed {
                    generation,
                    error: err.user_message(),
                });
            }
        }
    });
}

/// Newest page of messages for a freshly selected conversation. The caller
/// has already put the feed into `LoadingInitial`.
pub fn fetch_feed(app: &mut App, conversation_id: ConversationId) {
    let Some(api) = app.api.clone() else { return };
    let page_size = app.message_page_size;
    let tx = app.event_tx.clone();

    tokio::task::spawn_local(async move {
        match api.fetch_messages(&conversation_id, None, page_size).await {
            Ok(messages) => {
                let _ = tx.send(NetEvent::FeedLoaded { conversation_id, messages });
            }
            Err(err) => {
                let _ = tx.send(NetEvent::FeedFailed {
                    conversation_id,
                    error: err.user_message(),
                });
            }
        }
    });
}

/// Turn a viewport-captured anchor into a backward fetch. The feed's phase
/// guard serializes these: a second call while one is in flight is refused
/// by `request_older`.
pub fn load_older(app: &mut App) {
    if app.api.is_none() {
        return;
    }
    let Some(anchor) = app.scroll.wants_older.take() else { return };
    let Some(before_id) = app.feed.request_older() else { return };
    let Some(conversation_id) = app.feed.conversation_id().cloned() else { return };
    let Some(api) = app.api.clone() else { return };
    let page_size = app.message_page_size;
    let tx = app.event_tx.clone();

    tokio::task::spawn_local(async move {
        match api.fetch_messages(&conversation_id, Some(before_id), page_size).await {
            Ok(messages) => {
                let _ = tx.send(NetEvent::OlderLoaded { conversation_id, messages, anchor });
            }
            Err(err) => {
                let _ = tx.send(NetEvent::OlderFailed {
                    conversation_id,
                    error: err.user_message(),
                });
            }
        }
    });
}

/// Idempotent server-side read acknowledgement. Issued only when the local
/// seen flag actually transitioned, so repeats cost nothing.
pub fn acknowledge_seen(app: &mut App, conversation_id: ConversationId) {
    let Some(api) = app.api.clone() else { return };
    let tx = app.event_tx.clone();

    tokio::task::spawn_local(async move {
        match api.mark_seen(&conversation_id).await {
            Ok(()) => {
                let _ = tx.send(NetEvent::SeenAcked { conversation_id });
            }
            Err(err) => {
                let _ = tx.send(NetEvent::SeenFailed {
                    conversation_id,
                    error: err.user_message(),
                });
            }
        }
    });
}

/// Optimistic text send: the outbox entry appears immediately, the server
/// message replaces it on completion.
pub fn send_text_message(app: &mut App, target: SendTarget, content: String) {
    let body = MessageBody::Text { content: content.clone() };
    let local_id = app.outbox.push(target.clone(), body);

    let Some(api) = app.api.clone() else { return };
    let tx = app.event_tx.clone();

    tokio::task::spawn_local(async move {
        match api.send_text(&target, &content).await {
            Ok(outcome) => {
                let _ = tx.send(NetEvent::SendSucceeded { local_id, outcome });
            }
            Err(err) => {
                let _ = tx.send(NetEvent::SendFailed { local_id, error: err.user_message() });
            }
        }
    });
}

/// Optimistic file send: the entry shows the local filename while the bytes
/// upload; the server message carries the stored file's signed URL.
pub fn send_attachment(app: &mut App, target: SendTarget, path: PathBuf) {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_owned());
    let mime_type = mime_type_for(&path);
    let body = MessageBody::File {
        file: FileRef {
            file_name: file_name.clone(),
            signed_url: String::new(),
            mime_type: mime_type.to_owned(),
        },
    };
    let local_id = app.outbox.push(target.clone(), body);

    let Some(api) = app.api.clone() else { return };
    let tx = app.event_tx.clone();

    tokio::task::spawn_local(async move {
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                let _ = tx.send(NetEvent::SendFailed {
                    local_id,
                    error: ApiError::Attachment(err.to_string()).user_message(),
                });
                return;
            }
        };
        match api.send_file(&target, &file_name, bytes, mime_type).await {
            Ok(outcome) => {
                let _ = tx.send(NetEvent::SendSucceeded { local_id, outcome });
            }
            Err(err) => {
                let _ = tx.send(NetEvent::SendFailed { local_id, error: err.user_message() });
            }
        }
    });
}

/// Resolve a `--user` deep link to its existing thread, or report that none
/// exists (which opens the start-conversation flow).
pub fn resolve_deep_link(app: &mut App, user_id: UserId) {
    let Some(api) = app.api.clone() else { return };
    let tx = app.event_tx.clone();

    tokio::task::spawn_local(async move {
        match api.find_user_conversation(&user_id).await {
            Ok(conversation) => {
                let _ = tx.send(NetEvent::DeepLinkResolved { user_id, conversation });
            }
            Err(err) if err.is_not_found() => {
                let _ = tx.send(NetEvent::DeepLinkNotFound { user_id });
            }
            Err(err) => {
                let _ = tx.send(NetEvent::DeepLinkFailed { user_id, error: err.user_message() });
            }
        }
    });
}

fn mime_type_for(path: &Path) -> &'static str {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "csv" => "text/csv",
        "txt" => "text/plain",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
}
