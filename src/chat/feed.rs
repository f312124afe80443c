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

//! Per-conversation message feed.
//!
//! Phase machine: `Idle → LoadingInitial → Ready ⇄ LoadingOlder`. The cache
//! is exclusively owned here; the scroll-anchor engine only ever reads the
//! id list and geometry. Every completion re-checks the conversation id it
//! was issued for, so a late response after a selection change is dropped
//! without touching the new conversation's cache.

use crate::api::types::{Conversation, ConversationId, Message, MessageId};
use chrono::{Local, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    Idle,
    LoadingInitial,
    Ready,
    LoadingOlder,
}

#[derive(Debug, Default)]
pub struct MessageFeed {
    conversation_id: Option<ConversationId>,
    first_message_id: Option<MessageId>,
    /// Ascending by id, no duplicates.
    messages: Vec<Message>,
    phase: FeedPhase,
}

impl Default for FeedPhase {
    fn default() -> Self {
        Self::Idle
    }
}

impl MessageFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> FeedPhase {
        self.phase
    }

    #[must_use]
    pub fn conversation_id(&self) -> Option<&ConversationId> {
        self.conversation_id.as_ref()
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn is_current(&self, id: &ConversationId) -> bool {
        self.conversation_id.as_ref() == Some(id)
    }

    #[must_use]
    pub fn min_id(&self) -> Option<MessageId> {
        self.messages.first().map(|m| m.id)
    }

    #[must_use]
    pub fn max_id(&self) -> Option<MessageId> {
        self.messages.last().map(|m| m.id)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, FeedPhase::LoadingInitial | FeedPhase::LoadingOlder)
    }

    /// More history exists while the lowest cached id is still above the
    /// conversation's first message id.
    #[must_use]
    pub fn has_more_history(&self) -> bool {
        match (self.min_id(), self.first_message_id) {
            (Some(min), Some(first)) => min > first,
            _ => false,
        }
    }

    /// Start over for a newly selected conversation: the previous cache is
    /// discarded and the newest page is expected next.
    pub fn begin_initial(&mut self, conversation: &Conversation) {
        self.conversation_id = Some(conversation.id.clone());
        self.first_message_id = Some(conversation.first_message_id);
        self.messages.clear();
        self.phase = FeedPhase::LoadingInitial;
    }

    /// Drop everything (no conversation selected).
    pub fn clear(&mut self) {
        self.conversation_id = None;
        self.first_message_id = None;
        self.messages.clear();
        self.phase = FeedPhase::Idle;
    }

    /// Newest page arrived. Ignored when the selection moved on or the feed
    /// is not waiting for an initial page.
    pub fn complete_initial(&mut self, id: &ConversationId, messages: Vec<Message>) -> bool {
        if !self.is_current(id) || self.phase != FeedPhase::LoadingInitial {
            tracing::debug!("dropping stale initial page for {id}");
            return false;
        }
        self.merge(messages);
        self.phase = FeedPhase::Ready;
        true
    }

    pub fn fail_initial(&mut self, id: &ConversationId) -> bool {
        if !self.is_current(id) || self.phase != FeedPhase::LoadingInitial {
            return false;
        }
        self.phase = FeedPhase::Idle;
        true
    }

    /// Guarded entry into `LoadingOlder`. Returns the exclusive upper bound
    /// for the backward fetch, or `None` when the feed is busy or the
    /// history is already complete.
    pub fn request_older(&mut self) -> Option<MessageId> {
        if self.phase != FeedPhase::Ready {
            return None;
        }
        if !self.has_more_history() {
            return None;
        }
        let before = self.min_id()?;
        self.phase = FeedPhase::LoadingOlder;
        Some(before)
    }

    /// Older page arrived: prepend-merge (by id, deduplicated) and return to
    /// `Ready`. Stale completions are dropped.
    pub fn complete_older(&mut self, id: &ConversationId, messages: Vec<Message>) -> bool {
        if !self.is_current(id) {
            tracing::debug!("dropping stale older page for {id}");
            return false;
        }
        if self.phase != FeedPhase::LoadingOlder {
            return false;
        }
        self.merge(messages);
        self.phase = FeedPhase::Ready;
        true
    }

    /// A failed backward fetch returns to `Ready` without touching the
    /// cache, so the user can scroll to retry.
    pub fn fail_older(&mut self, id: &ConversationId) -> bool {
        if !self.is_current(id) || self.phase != FeedPhase::LoadingOlder {
            return false;
        }
        self.phase = FeedPhase::Ready;
        true
    }

    /// Insert one message in id order unless it is already cached. Used to
    /// reconcile a completed send (idempotent with a concurrent refresh).
    pub fn merge_message(&mut self, message: Message) -> bool {
        if !self.is_current(&message.conversation_id) {
            return false;
        }
        match self.messages.binary_search_by_key(&message.id, |m| m.id) {
            Ok(_) => false,
            Err(position) => {
                self.messages.insert(position, message);
                true
            }
        }
    }

    fn merge(&mut self, incoming: Vec<Message>) {
        self.messages.extend(incoming);
        self.messages.sort_by_key(|m| m.id);
        self.messages.dedup_by_key(|m| m.id);
    }

    /// Pure projection grouping the ordered messages by local calendar date,
    /// for the date separators in the feed. Not stored state.
    #[must_use]
    pub fn grouped_by_day(&self) -> Vec<(NaiveDate, Vec<&Message>)> {
        let mut groups: Vec<(NaiveDate, Vec<&Message>)> = Vec::new();
        for message in &self.messages {
            let day = message.date.with_timezone(&Local).date_naive();
            match groups.last_mut() {
                Some((current, bucket)) if *current == day => bucket.push(message),
                _ => groups.push((day, vec![message])),
            }
        }
        groups
    }
}
