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

//! Event application: terminal input routing and network completions.
//!
//! Every `NetEvent` carries the context it was issued under (conversation
//! id, search generation); the controllers drop completions whose context no
//! longer matches current state. That re-check is the only cancellation
//! mechanism — there are no abort handles.

use crate::api::types::{
    Conversation, ConversationId, ConversationPage, LastMessage, Message, SendOutcome, SendTarget,
    UserId,
};
use crate::app::dialog::DialogFlow;
use crate::app::state::{App, Pane, ToastLevel};
use crate::app::tasks;
use crate::chat::anchor::ScrollAnchor;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use std::path::PathBuf;
use std::time::Instant;
use uuid::Uuid;

/// Completions posted back to the event loop by the network tasks.
#[derive(Debug)]
pub enum NetEvent {
    ConversationsLoaded { generation: u64, append: bool, page: ConversationPage },
    ConversationsFailed { generation: u64, error: String },
    FeedLoaded { conversation_id: ConversationId, messages: Vec<Message> },
    FeedFailed { conversation_id: ConversationId, error: String },
    OlderLoaded { conversation_id: ConversationId, messages: Vec<Message>, anchor: ScrollAnchor },
    OlderFailed { conversation_id: ConversationId, error: String },
    SeenAcked { conversation_id: ConversationId },
    SeenFailed { conversation_id: ConversationId, error: String },
    SendSucceeded { local_id: Uuid, outcome: SendOutcome },
    SendFailed { local_id: Uuid, error: String },
    DeepLinkResolved { user_id: UserId, conversation: Conversation },
    DeepLinkNotFound { user_id: UserId },
    DeepLinkFailed { user_id: UserId, error: String },
}

// ---------------------------------------------------------------------------
// Terminal events
// ---------------------------------------------------------------------------

pub fn handle_terminal_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            if app.dialog.is_some() {
                handle_dialog_key(app, key);
            } else {
                handle_normal_key(app, key);
            }
        }
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Paste(text) => match app.focus {
            Pane::Compose => app.input.insert_str(&text),
            Pane::Sidebar => {
                app.search_input.push_str(text.trim());
                apply_search(app);
            }
        },
        // Resize is handled automatically by ratatui
        _ => {}
    }
}

const MOUSE_SCROLL_LINES: usize = 3;

fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    let in_chat = contains(app.rendered_chat_area, mouse.column, mouse.row);
    let in_sidebar = contains(app.rendered_sidebar_area, mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::ScrollUp if in_chat => scroll_chat_up(app, MOUSE_SCROLL_LINES),
        MouseEventKind::ScrollDown if in_chat => scroll_chat_down(app, MOUSE_SCROLL_LINES),
        MouseEventKind::ScrollUp if in_sidebar => {
            let count = app.conversations.conversations().len();
            let rows = app.sidebar_view_rows;
            app.sidebar_nav.move_up(count, rows);
        }
        MouseEventKind::ScrollDown if in_sidebar => {
            let count = app.conversations.conversations().len();
            let rows = app.sidebar_view_rows;
            app.sidebar_nav.move_down(count, rows);
        }
        _ => {}
    }
}

fn contains(area: ratatui::layout::Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
}

fn handle_normal_key(app: &mut App, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        (KeyCode::Tab, _) | (KeyCode::BackTab, _) => {
            app.focus = match app.focus {
                Pane::Sidebar => Pane::Compose,
                Pane::Compose => Pane::Sidebar,
            };
        }
        // Ctrl+L: force full terminal redraw
        (KeyCode::Char('l'), m) if m.contains(KeyModifiers::CONTROL) => {
            app.force_redraw = true;
        }
        _ => match app.focus {
            Pane::Sidebar => handle_sidebar_key(app, key),
            Pane::Compose => handle_compose_key(app, key),
        },
    }
}

fn handle_sidebar_key(app: &mut App, key: KeyEvent) {
    let count = app.conversations.conversations().len();
    let rows = app.sidebar_view_rows;
    match key.code {
        KeyCode::Up => app.sidebar_nav.move_up(count, rows),
        KeyCode::Down => {
            let at_end = count == 0 || app.sidebar_nav.selected + 1 >= count;
            app.sidebar_nav.move_down(count, rows);
            // Stepping past the last loaded row grows the list by one page
            if at_end && app.conversations.cursor.has_more() {
                tasks::load_conversations(app, true);
            }
        }
        KeyCode::Enter => {
            if let Some(conversation) =
                app.conversations.conversations().get(app.sidebar_nav.selected)
            {
                let id = conversation.id.clone();
                select_conversation(app, id);
                app.focus = Pane::Compose;
            }
        }
        KeyCode::Esc => {
            if !app.search_input.is_empty() {
                app.search_input.clear();
                apply_search(app);
            }
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            apply_search(app);
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            apply_search(app);
        }
        _ => {}
    }
}

/// Push the live search box into the controller: the cursor resets and the
/// debounce re-arms on the keystroke; the fetch fires from the frame tick.
fn apply_search(app: &mut App) {
    let term = app.search_input.clone();
    if app.conversations.set_search(term, Instant::now()) {
        app.sidebar_nav = crate::app::dialog::ListNav::default();
    }
}

fn handle_compose_key(app: &mut App, key: KeyEvent) {
    match (key.code, key.modifiers) {
        // Enter (no shift): submit; Shift+Enter: newline
        (KeyCode::Enter, m) if !m.contains(KeyModifiers::SHIFT) => submit_input(app),
        (KeyCode::Enter, _) => app.input.insert_newline(),
        // Feed scrolling
        (KeyCode::Up, m) if m.contains(KeyModifiers::CONTROL) => scroll_chat_up(app, 1),
        (KeyCode::Down, m) if m.contains(KeyModifiers::CONTROL) => scroll_chat_down(app, 1),
        (KeyCode::PageUp, _) => {
            let step = (app.chat_view_rows / 2).max(1);
            scroll_chat_up(app, step);
        }
        (KeyCode::PageDown, _) => {
            let step = (app.chat_view_rows / 2).max(1);
            scroll_chat_down(app, step);
        }
        // Ctrl+J: jump back to the newest message
        (KeyCode::Char('j'), m) if m.contains(KeyModifiers::CONTROL) => {
            app.scroll.stick_to_bottom = true;
        }
        // Ctrl+D: dismiss failed sends
        (KeyCode::Char('d'), m) if m.contains(KeyModifiers::CONTROL) => {
            app.outbox.discard_failed();
        }
        // Composer editing
        (KeyCode::Left, _) => app.input.move_left(),
        (KeyCode::Right, _) => app.input.move_right(),
        (KeyCode::Up, _) => app.input.move_up(),
        (KeyCode::Down, _) => app.input.move_down(),
        (KeyCode::Home, _) => app.input.move_home(),
        (KeyCode::End, _) => app.input.move_end(),
        (KeyCode::Backspace, _) => app.input.delete_char_before(),
        (KeyCode::Delete, _) => app.input.delete_char_after(),
        (KeyCode::Char(c), _) => app.input.insert_char(c),
        _ => {}
    }
}

fn scroll_chat_up(app: &mut App, lines: usize) {
    app.scroll.top = app.scroll.top.saturating_sub(lines);
    app.scroll.stick_to_bottom = false;
}

fn scroll_chat_down(app: &mut App, lines: usize) {
    // Clamping (and re-engaging stick_to_bottom at the end) happens against
    // real geometry in ui::chat::render.
    app.scroll.top = app.scroll.top.saturating_add(lines);
}

// ---------------------------------------------------------------------------
// Dialog flow (conversation-not-found recovery)
// ---------------------------------------------------------------------------

fn handle_dialog_key(app: &mut App, key: KeyEvent) {
    let Some(flow) = app.dialog.take() else { return };
    match flow {
        DialogFlow::ConfirmStart { user_id, mut accept_selected } => match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                accept_selected = !accept_selected;
                app.dialog = Some(DialogFlow::ConfirmStart { user_id, accept_selected });
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                app.dialog = Some(DialogFlow::compose(user_id));
            }
            KeyCode::Enter => {
                if accept_selected {
                    app.dialog = Some(DialogFlow::compose(user_id));
                }
                // Declined: dialog stays closed, view stays unselected
            }
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {}
            _ => app.dialog = Some(DialogFlow::ConfirmStart { user_id, accept_selected }),
        },
        DialogFlow::ComposeFirst { user_id, mut input } => match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => {}
            (KeyCode::Enter, m) if !m.contains(KeyModifiers::SHIFT) => {
                let text = input.text();
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    app.dialog = Some(DialogFlow::ComposeFirst { user_id, input });
                } else {
                    let target = SendTarget::User(user_id);
                    tasks::send_text_message(app, target, trimmed.to_owned());
                    // Dialog closes; SendSucceeded folds the new thread in
                }
            }
            (code, _) => {
                match code {
                    KeyCode::Enter => input.insert_newline(),
                    KeyCode::Left => input.move_left(),
                    KeyCode::Right => input.move_right(),
                    KeyCode::Home => input.move_home(),
                    KeyCode::End => input.move_end(),
                    KeyCode::Backspace => input.delete_char_before(),
                    KeyCode::Delete => input.delete_char_after(),
                    KeyCode::Char(c) => input.insert_char(c),
                    _ => {}
                }
                app.dialog = Some(DialogFlow::ComposeFirst { user_id, input });
            }
        },
    }
}

// ---------------------------------------------------------------------------
// Selection handoff and submission
// ---------------------------------------------------------------------------

/// Make a conversation active. Reselecting the current id is a no-op (no
/// refetch); a real change discards the previous feed, loads the newest
/// page, pins the scroll to the bottom, and acknowledges `seen` once.
pub fn select_conversation(app: &mut App, id: ConversationId) {
    let Some(conversation) = app.conversations.get(&id).cloned() else {
        tracing::warn!("select for unknown conversation {id}");
        return;
    };
    if !app.conversations.select(Some(id.clone())) {
        return;
    }

    app.outbox.clear();
    app.scroll.reset_to_bottom();
    app.feed.begin_initial(&conversation);
    tasks::fetch_feed(app, conversation.id.clone());

    if app.conversations.mark_seen_local(&id) {
        tasks::acknowledge_seen(app, id);
    }
}

/// Submit the composer: plain text, or `/attach <path>` for a file message.
pub fn submit_input(app: &mut App) {
    let text = app.input.text();
    if submit_text(app, &text) {
        app.input.clear();
    }
}

/// Send `text` to the selected conversation. Returns whether a send was
/// actually queued.
pub fn submit_text(app: &mut App, text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    let Some(conversation_id) = app.conversations.selected().cloned() else {
        app.show_toast(ToastLevel::Info, "Select a conversation first.");
        return false;
    };
    let target = SendTarget::Conversation(conversation_id);

    if let Some(path) = trimmed.strip_prefix("/attach ") {
        tasks::send_attachment(app, target, PathBuf::from(path.trim()));
    } else {
        tasks::send_text_message(app, target, trimmed.to_owned());
    }

    // The optimistic entry appears at the bottom — keep it in view
    app.scroll.stick_to_bottom = true;
    true
}

// ---------------------------------------------------------------------------
// Network completions
// ---------------------------------------------------------------------------

pub fn handle_net_event(app: &mut App, event: NetEvent) {
    match event {
        NetEvent::ConversationsLoaded { generation, append, page } => {
            if app.conversations.apply_page(generation, append, page) && !append {
                let count = app.conversations.conversations().len();
                let rows = app.sidebar_view_rows;
                app.sidebar_nav.clamp(count, rows);
            }
        }
        NetEvent::ConversationsFailed { generation, error } => {
            app.conversations.fetch_failed(generation);
            app.show_toast(ToastLevel::Error, error);
        }
        NetEvent::FeedLoaded { conversation_id, messages } => {
            if app.feed.complete_initial(&conversation_id, messages) {
                app.scroll.reset_to_bottom();
            }
        }
        NetEvent::FeedFailed { conversation_id, error } => {
            if app.feed.fail_initial(&conversation_id) {
                app.show_toast(ToastLevel::Error, error);
            }
        }
        NetEvent::OlderLoaded { conversation_id, messages, anchor } => {
            if app.feed.complete_older(&conversation_id, messages) {
                // Consumed by ui::chat at the first render after the merge
                app.scroll.pending_anchor = Some(anchor);
            }
        }
        NetEvent::OlderFailed { conversation_id, error } => {
            if app.feed.fail_older(&conversation_id) {
                app.show_toast(ToastLevel::Error, error);
            }
        }
        NetEvent::SeenAcked { conversation_id } => {
            tracing::debug!("seen acknowledged for {conversation_id}");
        }
        NetEvent::SeenFailed { conversation_id, error } => {
            tracing::warn!("seen ack failed for {conversation_id}: {error}");
        }
        NetEvent::SendSucceeded { local_id, outcome } => apply_send_success(app, local_id, outcome),
        NetEvent::SendFailed { local_id, error } => {
            app.outbox.fail(local_id);
            app.show_toast(ToastLevel::Error, error);
            if !app.outbox.is_sending() {
                // Sending just transitioned to idle
                app.scroll.stick_to_bottom = true;
            }
        }
        NetEvent::DeepLinkResolved { user_id, conversation } => {
            tracing::info!("deep link for {user_id} resolved to {}", conversation.id);
            app.conversations.upsert_front(conversation.clone());
            select_conversation(app, conversation.id);
            app.focus = Pane::Compose;
        }
        NetEvent::DeepLinkNotFound { user_id } => {
            // Not an error: offer to start the thread
            app.conversations.select(None);
            app.feed.clear();
            app.dialog = Some(DialogFlow::confirm(user_id));
        }
        NetEvent::DeepLinkFailed { user_id, error } => {
            tracing::warn!("deep link lookup failed for {user_id}");
            app.show_toast(ToastLevel::Error, error);
        }
    }
}

fn apply_send_success(app: &mut App, local_id: Uuid, outcome: SendOutcome) {
    let Some(_entry) = app.outbox.complete(local_id) else {
        // A cleared outbox (conversation switch) — still fold the message in
        // if it belongs to the current feed.
        app.feed.merge_message(outcome.message);
        return;
    };

    let message = outcome.message;
    if let Some(conversation) = outcome.conversation {
        // User-addressed send: the backend created the thread as a side
        // effect; fold it to the top of the list and open it.
        app.conversations.upsert_front(conversation.clone());
        app.conversations.select(Some(conversation.id.clone()));
        app.feed.begin_initial(&conversation);
        app.feed.complete_initial(&conversation.id, vec![message]);
        app.dialog = None;
        app.focus = Pane::Compose;
    } else {
        let conversation_id = message.conversation_id.clone();
        app.conversations.update_preview(
            &conversation_id,
            LastMessage { body: message.body.clone(), date: message.date },
        );
        // Idempotent with any concurrent feed refresh that already has it
        app.feed.merge_message(message);
    }

    // Own successful send always returns the view to the newest message
    app.scroll.reset_to_bottom();
}
