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

//! Conversation list controller: search-debounced pagination, seen state,
//! and the selection handoff to the message feed.

use crate::api::types::{Conversation, ConversationId, ConversationPage, LastMessage};
use crate::chat::cursor::PageCursor;
use crate::chat::debounce::Debouncer;
use std::time::{Duration, Instant};

pub struct ConversationList {
    search: String,
    /// Bumped on every search change; list completions carrying an older
    /// generation are dropped (the stale-response guard).
    generation: u64,
    pub cursor: PageCursor,
    pub debounce: Debouncer,
    conversations: Vec<Conversation>,
    selected: Option<ConversationId>,
    pub loading: bool,
}

impl ConversationList {
    #[must_use]
    pub fn new(page_size: u32, debounce_delay: Duration) -> Self {
        Self {
            search: String::new(),
            generation: 0,
            cursor: PageCursor::new(page_size),
            debounce: Debouncer::new(debounce_delay),
            conversations: Vec::new(),
            selected: None,
            loading: false,
        }
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    #[must_use]
    pub fn get(&self, id: &ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| &c.id == id)
    }

    #[must_use]
    pub fn selected(&self) -> Option<&ConversationId> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn selected_conversation(&self) -> Option<&Conversation> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    /// Update the search predicate. The cursor resets and the generation
    /// bumps immediately (before the debounced fetch can fire); the network
    /// effect is deferred behind the debounce. Identical terms are no-ops.
    pub fn set_search(&mut self, term: String, now: Instant) -> bool {
        if term == self.search {
            return false;
        }
        self.search = term;
        self.generation += 1;
        self.cursor.reset();
        self.debounce.schedule(now);
        true
    }

    /// Fold a fetched page in. Replace or merge per `append`; merging skips
    /// ids already present so overlapping fetches can never duplicate a
    /// conversation. Pages from a stale generation are discarded untouched.
    pub fn apply_page(&mut self, generation: u64, append: bool, page: ConversationPage) -> bool {
        if generation != self.generation {
            tracing::debug!(
                "dropping stale conversation page (generation {generation} != {})",
                self.generation
            );
            return false;
        }
        self.loading = false;
        self.cursor.set_from_response(page.total, Some(page.has_more));
        if append {
            for conversation in page.conversations {
                if self.get(&conversation.id).is_none() {
                    self.conversations.push(conversation);
                }
            }
        } else {
            self.conversations = page.conversations;
        }
        true
    }

    /// A failed fetch clears the loading flag and nothing else — the
    /// previous collection stays intact so append errors cannot wipe state.
    pub fn fetch_failed(&mut self, generation: u64) {
        if generation == self.generation {
            self.loading = false;
        }
    }

    /// Change the active conversation. Returns true only when the id
    /// actually changed, so reselecting is free of side effects.
    pub fn select(&mut self, id: Option<ConversationId>) -> bool {
        if self.selected == id {
            return false;
        }
        self.selected = id;
        true
    }

    /// Local seen transition. Returns true only on false→true; callers issue
    /// the network acknowledgement exactly when this returns true, which
    /// keeps repeated calls free of duplicate side effects.
    pub fn mark_seen_local(&mut self, id: &ConversationId) -> bool {
        match self.conversations.iter_mut().find(|c| &c.id == id) {
            Some(conversation) if !conversation.seen => {
                conversation.seen = true;
                true
            }
            _ => false,
        }
    }

    /// Fold a newly created thread to the top without a reload (used when a
    /// user-addressed send creates the conversation server-side).
    pub fn upsert_front(&mut self, conversation: Conversation) {
        self.conversations.retain(|c| c.id != conversation.id);
        self.conversations.insert(0, conversation);
    }

    /// Refresh the sidebar preview after a send.
    pub fn update_preview(&mut self, id: &ConversationId, last_message: LastMessage) {
        if let Some(conversation) = self.conversations.iter_mut().find(|c| &c.id == id) {
            conversation.last_message = Some(last_message);
        }
    }
}
