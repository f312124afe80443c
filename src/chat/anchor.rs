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

//! Scroll anchoring for backward pagination.
//!
//! Prepending older messages above the viewport must not move the content
//! the operator is looking at. Immediately before the fetch, the top-most
//! visible message and its offset from the scroll position are captured;
//! after the merge the same message is re-seated at the same offset.
//!
//! Geometry is abstracted behind [`Viewport`] so the algorithm runs
//! identically over the terminal renderer and a fake in tests. The engine
//! only reads positions and writes the scroll offset — it never touches the
//! feed's message cache.

use crate::api::types::MessageId;

/// Rows from the top within which scrolling triggers a backward fetch.
pub const TOP_FETCH_THRESHOLD: usize = 4;

/// Rows of undershoot from the bottom beyond which the jump-to-latest
/// affordance is shown.
pub const BOTTOM_AFFORDANCE_THRESHOLD: usize = 6;

/// Minimal view of a scrollable message container. All units are rows of
/// content (the terminal analogue of pixels).
pub trait Viewport {
    fn scroll_top(&self) -> usize;
    fn viewport_height(&self) -> usize;
    fn content_height(&self) -> usize;
    /// Top row of the rendered element for a message, if it is rendered.
    fn element_top(&self, id: MessageId) -> Option<usize>;
    fn element_height(&self, id: MessageId) -> Option<usize>;
    fn set_scroll_top(&mut self, top: usize);
}

/// Transient per-fetch value: captured right before an older-page fetch,
/// consumed at the first render after the merge. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollAnchor {
    pub message_id: MessageId,
    /// Signed offset of the element's top from the scroll position.
    /// Negative when the element straddles the viewport's top edge.
    pub offset: isize,
}

#[must_use]
pub fn max_scroll(view: &impl Viewport) -> usize {
    view.content_height().saturating_sub(view.viewport_height())
}

/// Whether the scroll position is close enough to the top to warrant
/// fetching the next older page.
#[must_use]
pub fn near_top(view: &impl Viewport) -> bool {
    view.scroll_top() <= TOP_FETCH_THRESHOLD
}

/// Whether the view has been scrolled far enough off the bottom that the
/// jump-to-latest affordance should be offered. Purely derived state.
#[must_use]
pub fn show_jump_to_latest(view: &impl Viewport) -> bool {
    max_scroll(view).saturating_sub(view.scroll_top()) > BOTTOM_AFFORDANCE_THRESHOLD
}

/// Capture the anchor: the first message (top-down) whose bottom edge lies
/// below the viewport's top edge. `ids_top_down` is the feed's ordered id
/// list; ids without a rendered element are skipped.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn capture(view: &impl Viewport, ids_top_down: &[MessageId]) -> Option<ScrollAnchor> {
    let top = view.scroll_top();
    for &id in ids_top_down {
        let Some(element_top) = view.element_top(id) else { continue };
        let height = view.element_height(id).unwrap_or(1);
        if element_top + height > top {
            return Some(ScrollAnchor {
                message_id: id,
                offset: element_top as isize - top as isize,
            });
        }
    }
    None
}

/// Re-seat the anchored message at its captured offset. When the anchor
/// element cannot be found after the merge (it always should be, given
/// correct merge semantics) the restore is skipped silently.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub fn restore(view: &mut impl Viewport, anchor: ScrollAnchor) {
    let Some(element_top) = view.element_top(anchor.message_id) else {
        tracing::debug!("anchor message {} not found after merge", anchor.message_id);
        return;
    };
    let target = element_top as isize - anchor.offset;
    let clamped = target.max(0) as usize;
    view.set_scroll_top(clamped.min(max_scroll(view)));
}
