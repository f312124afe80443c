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

use crate::api::ChatApi;
use crate::api::types::Conversation;
use crate::app::dialog::{DialogFlow, ListNav};
use crate::app::events::NetEvent;
use crate::app::input::InputState;
use crate::chat::anchor::ScrollAnchor;
use crate::chat::conversations::ConversationList;
use crate::chat::feed::MessageFeed;
use crate::chat::outbox::Outbox;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// How long a toast stays in the footer.
pub const TOAST_TTL: Duration = Duration::from_secs(4);

/// Which pane owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Sidebar,
    Compose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
}

#[derive(Debug)]
pub struct Toast {
    pub level: ToastLevel,
    pub text: String,
    pub shown_at: Instant,
}

/// Feed scroll state, in content rows. Written by the key/mouse handlers
/// and reconciled against geometry by `ui::chat::render` each frame.
#[derive(Debug, Default)]
pub struct FeedScroll {
    pub top: usize,
    /// Pin the view to the newest message. Set on initial load, own send,
    /// and the sending→idle transition; never by backward-pagination merges.
    pub stick_to_bottom: bool,
    /// Anchor to re-seat at the first render after an older-page merge.
    pub pending_anchor: Option<ScrollAnchor>,
    /// Anchor captured at the top of the viewport, waiting for the event
    /// loop to turn it into a backward fetch.
    pub wants_older: Option<ScrollAnchor>,
    /// Derived per frame: the view is far enough off the bottom that the
    /// jump-to-latest affordance is offered.
    pub show_jump_affordance: bool,
}

impl FeedScroll {
    pub fn reset_to_bottom(&mut self) {
        *self = Self { stick_to_bottom: true, ..Self::default() };
    }
}

pub struct App {
    pub conversations: ConversationList,
    pub feed: MessageFeed,
    pub outbox: Outbox,
    pub scroll: FeedScroll,

    /// Message composer (bottom bar).
    pub input: InputState,
    /// Live sidebar search box text; debounced into the list controller.
    pub search_input: String,
    pub focus: Pane,
    pub sidebar_nav: ListNav,
    pub dialog: Option<DialogFlow>,
    pub toast: Option<Toast>,

    pub should_quit: bool,
    pub force_redraw: bool,
    pub spinner_frame: usize,

    /// Absent in tests — the integration suite drives `handle_net_event`
    /// directly instead of the network.
    pub api: Option<Rc<ChatApi>>,
    pub message_page_size: u32,

    pub event_tx: mpsc::UnboundedSender<NetEvent>,
    pub event_rx: mpsc::UnboundedReceiver<NetEvent>,

    /// Geometry captured at render time, for mouse routing and paging steps.
    pub rendered_chat_area: ratatui::layout::Rect,
    pub rendered_sidebar_area: ratatui::layout::Rect,
    pub chat_view_rows: usize,
    pub sidebar_view_rows: usize,
}

impl App {
    #[must_use]
    pub fn new(
        api: Option<Rc<ChatApi>>,
        conversation_page_size: u32,
        message_page_size: u32,
        search_debounce: Duration,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            conversations: ConversationList::new(conversation_page_size, search_debounce),
            feed: MessageFeed::new(),
            outbox: Outbox::new(),
            scroll: FeedScroll { stick_to_bottom: true, ..FeedScroll::default() },
            input: InputState::new(),
            search_input: String::new(),
            focus: Pane::Sidebar,
            sidebar_nav: ListNav::default(),
            dialog: None,
            toast: None,
            should_quit: false,
            force_redraw: false,
            spinner_frame: 0,
            api,
            message_page_size,
            event_tx,
            event_rx,
            rendered_chat_area: ratatui::layout::Rect::default(),
            rendered_sidebar_area: ratatui::layout::Rect::default(),
            chat_view_rows: 24,
            sidebar_view_rows: 20,
        }
    }

    /// Minimal `App` for the integration suite: no API client, no terminal —
    /// just state.
    #[must_use]
    pub fn test_default() -> Self {
        Self::new(None, 20, 30, Duration::from_millis(700))
    }

    pub fn show_toast(&mut self, level: ToastLevel, text: impl Into<String>) {
        self.toast = Some(Toast { level, text: text.into(), shown_at: Instant::now() });
    }

    /// Anything in flight that warrants the spinner.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.conversations.loading || self.feed.is_loading() || self.outbox.is_sending()
    }

    #[must_use]
    pub fn selected_conversation(&self) -> Option<&Conversation> {
        self.conversations.selected_conversation()
    }
}
