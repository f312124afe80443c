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

use crate::api::types::UserId;
use crate::app::input::InputState;

/// The conversation-not-found recovery flow: a deep link pointed at a client
/// with no existing thread. Step one confirms intent, step two composes the
/// first message; the send then creates the thread server-side. Declining at
/// either step returns to the empty/no-selection state.
#[derive(Debug)]
pub enum DialogFlow {
    ConfirmStart { user_id: UserId, accept_selected: bool },
    ComposeFirst { user_id: UserId, input: InputState },
}

impl DialogFlow {
    #[must_use]
    pub fn confirm(user_id: UserId) -> Self {
        Self::ConfirmStart { user_id, accept_selected: true }
    }

    #[must_use]
    pub fn compose(user_id: UserId) -> Self {
        Self::ComposeFirst { user_id, input: InputState::new() }
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        match self {
            Self::ConfirmStart { user_id, .. } | Self::ComposeFirst { user_id, .. } => user_id,
        }
    }
}

/// Shared list navigation state for the conversation sidebar: a highlight
/// index plus the first visible row of the scroll window.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListNav {
    pub selected: usize,
    pub scroll_offset: usize,
}

impl ListNav {
    /// Clamp selection + scroll to the current item count and window size.
    pub fn clamp(&mut self, item_count: usize, max_visible: usize) {
        if item_count == 0 || max_visible == 0 {
            self.selected = 0;
            self.scroll_offset = 0;
            return;
        }

        self.selected = self.selected.min(item_count - 1);
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + max_visible {
            self.scroll_offset = self.selected + 1 - max_visible;
        }

        let max_start = item_count.saturating_sub(max_visible);
        self.scroll_offset = self.scroll_offset.min(max_start);
    }

    /// Move the highlight one row up. Stops at the top (the sidebar is a
    /// long paginated list — wrap-around would be disorienting).
    pub fn move_up(&mut self, item_count: usize, max_visible: usize) {
        self.selected = self.selected.saturating_sub(1);
        self.clamp(item_count, max_visible);
    }

    /// Move the highlight one row down, saturating at the last item.
    pub fn move_down(&mut self, item_count: usize, max_visible: usize) {
        if item_count > 0 && self.selected + 1 < item_count {
            self.selected += 1;
        }
        self.clamp(item_count, max_visible);
    }

    /// Compute the `[start, end)` visible slice for rendering.
    #[must_use]
    pub fn visible_range(&self, item_count: usize, max_visible: usize) -> (usize, usize) {
        if item_count == 0 || max_visible == 0 {
            return (0, 0);
        }
        let max_start = item_count.saturating_sub(max_visible);
        let start = self.scroll_offset.min(max_start);
        let end = (start + max_visible).min(item_count);
        (start, end)
    }
}
