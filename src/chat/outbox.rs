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

//! Optimistic send entries.
//!
//! Each submission gets its own entry keyed by a local id, so overlapping
//! sends can never lose an earlier optimistic message. On success the entry
//! is removed and the server-issued message merged into the feed by id; on
//! failure the entry stays, marked `Failed`, so the operator can see the
//! difference.

use crate::api::types::{MessageBody, SendTarget};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboxState {
    Sending,
    Failed,
}

#[derive(Debug, Clone)]
pub struct OutboxEntry {
    pub local_id: Uuid,
    pub target: SendTarget,
    pub body: MessageBody,
    pub queued_at: DateTime<Utc>,
    pub state: OutboxState,
}

#[derive(Debug, Default)]
pub struct Outbox {
    entries: Vec<OutboxEntry>,
}

impl Outbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an optimistic entry and return its local id.
    pub fn push(&mut self, target: SendTarget, body: MessageBody) -> Uuid {
        let local_id = Uuid::new_v4();
        self.entries.push(OutboxEntry {
            local_id,
            target,
            body,
            queued_at: Utc::now(),
            state: OutboxState::Sending,
        });
        local_id
    }

    #[must_use]
    pub fn entries(&self) -> &[OutboxEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True while any entry is still in flight — drives the progress
    /// indicator and the sending→idle bottom-scroll trigger.
    #[must_use]
    pub fn is_sending(&self) -> bool {
        self.entries.iter().any(|e| e.state == OutboxState::Sending)
    }

    /// Remove the entry for a completed send. Returns it so the caller can
    /// reconcile (merge the server message, fold a new conversation in).
    pub fn complete(&mut self, local_id: Uuid) -> Option<OutboxEntry> {
        let position = self.entries.iter().position(|e| e.local_id == local_id)?;
        Some(self.entries.remove(position))
    }

    /// Mark a failed send. The entry is kept so failure stays visible.
    pub fn fail(&mut self, local_id: Uuid) -> bool {
        match self.entries.iter_mut().find(|e| e.local_id == local_id) {
            Some(entry) => {
                entry.state = OutboxState::Failed;
                true
            }
            None => false,
        }
    }

    /// Drop a failed entry (operator dismissed it).
    pub fn discard_failed(&mut self) {
        self.entries.retain(|e| e.state != OutboxState::Failed);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
