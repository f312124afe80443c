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

/// Page/hasMore/total bookkeeping for one paginated resource.
///
/// Never issues network calls; callers read `page()`/`page_size()` to build
/// the request and feed the response back through `set_from_response`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    page: u32,
    page_size: u32,
    total: Option<u64>,
    has_more: bool,
}

impl PageCursor {
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self { page: 1, page_size, total: None, has_more: false }
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Back to page 1 with unknown total. Used on search-term changes.
    pub fn reset(&mut self) {
        self.page = 1;
        self.total = None;
        self.has_more = false;
    }

    /// Step to the next page. No-op (returns false) when the last response
    /// said there is nothing further — prevents redundant fetches.
    pub fn advance(&mut self) -> bool {
        if !self.has_more {
            return false;
        }
        self.page += 1;
        true
    }

    /// Record what the server said about the collection. When the server
    /// does not report `hasMore` itself, it is derived from the total.
    pub fn set_from_response(&mut self, total: u64, has_more: Option<bool>) {
        self.total = Some(total);
        self.has_more = has_more
            .unwrap_or_else(|| u64::from(self.page) * u64::from(self.page_size) < total);
    }
}
