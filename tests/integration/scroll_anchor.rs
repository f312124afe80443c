// =====
// TESTS: 6
// =====
//
// Scroll-anchor engine against a fake viewport: capture, jump-free restore,
// and the derived bottom affordance.

use coachdesk::api::types::MessageId;
use coachdesk::chat::anchor::{
    self, BOTTOM_AFFORDANCE_THRESHOLD, ScrollAnchor, Viewport,
};
use pretty_assertions::assert_eq;

/// Variable-height fake container: message heights are explicit, stacked in
/// order, so the restored offsets exercise real geometry arithmetic.
struct FakeViewport {
    rows: Vec<(MessageId, usize)>,
    scroll_top: usize,
    viewport_height: usize,
}

impl FakeViewport {
    fn new(rows: Vec<(u64, usize)>, scroll_top: usize, viewport_height: usize) -> Self {
        Self {
            rows: rows.into_iter().map(|(id, h)| (MessageId(id), h)).collect(),
            scroll_top,
            viewport_height,
        }
    }

    fn ids(&self) -> Vec<MessageId> {
        self.rows.iter().map(|(id, _)| *id).collect()
    }

    fn prepend(&mut self, rows: Vec<(u64, usize)>) {
        let mut merged: Vec<(MessageId, usize)> =
            rows.into_iter().map(|(id, h)| (MessageId(id), h)).collect();
        merged.extend(self.rows.iter().copied());
        self.rows = merged;
    }
}

impl Viewport for FakeViewport {
    fn scroll_top(&self) -> usize {
        self.scroll_top
    }
    fn viewport_height(&self) -> usize {
        self.viewport_height
    }
    fn content_height(&self) -> usize {
        self.rows.iter().map(|(_, h)| h).sum()
    }
    fn element_top(&self, id: MessageId) -> Option<usize> {
        let mut top = 0;
        for (row_id, height) in &self.rows {
            if *row_id == id {
                return Some(top);
            }
            top += height;
        }
        None
    }
    fn element_height(&self, id: MessageId) -> Option<usize> {
        self.rows.iter().find(|(row_id, _)| *row_id == id).map(|(_, h)| *h)
    }
    fn set_scroll_top(&mut self, top: usize) {
        self.scroll_top = top;
    }
}

#[test]
fn capture_picks_the_first_message_crossing_the_top_edge() {
    // 50 (rows 0..3), 51 (3..5), 52 (5..9), ... scroll_top = 4 → 51 straddles
    let view = FakeViewport::new(vec![(50, 3), (51, 2), (52, 4), (53, 1)], 4, 6);
    let anchor = anchor::capture(&view, &view.ids()).unwrap();
    assert_eq!(anchor.message_id, MessageId(51));
    assert_eq!(anchor.offset, -1);
}

#[test]
fn restore_is_jump_free_after_a_ten_message_prepend() {
    // Cached [50..60], viewing message 50 at the very top
    let heights: Vec<(u64, usize)> = (50..=60).map(|id| (id, 2)).collect();
    let mut view = FakeViewport::new(heights, 0, 10);
    let anchor = anchor::capture(&view, &view.ids()).unwrap();
    assert_eq!(anchor.message_id, MessageId(50));
    let offset_before = view.element_top(MessageId(50)).unwrap() as isize - view.scroll_top() as isize;

    // [40..49] merges in above
    view.prepend((40..=49).map(|id| (id, 2)).collect());
    anchor::restore(&mut view, anchor);

    let offset_after = view.element_top(MessageId(50)).unwrap() as isize - view.scroll_top() as isize;
    assert_eq!(offset_after, offset_before, "message 50 remains visually fixed");
}

#[test]
fn restore_handles_variable_heights_in_the_prepended_page() {
    let mut view = FakeViewport::new(vec![(50, 2), (51, 5), (52, 1)], 3, 6);
    let anchor = anchor::capture(&view, &view.ids()).unwrap();

    // Older page with irregular heights
    view.prepend(vec![(40, 7), (41, 1), (42, 3)]);
    anchor::restore(&mut view, anchor);

    let element_top = view.element_top(anchor.message_id).unwrap() as isize;
    assert_eq!(element_top - view.scroll_top() as isize, anchor.offset);
}

#[test]
fn restore_without_the_anchor_element_is_a_silent_noop() {
    let mut view = FakeViewport::new(vec![(50, 2), (51, 2)], 1, 4);
    anchor::restore(&mut view, ScrollAnchor { message_id: MessageId(7), offset: 0 });
    assert_eq!(view.scroll_top(), 1);
}

#[test]
fn capture_skips_ids_that_are_not_rendered() {
    let view = FakeViewport::new(vec![(51, 2), (52, 2)], 0, 4);
    // The feed knows about 50 but the viewport has no element for it
    let ids = vec![MessageId(50), MessageId(51), MessageId(52)];
    let anchor = anchor::capture(&view, &ids).unwrap();
    assert_eq!(anchor.message_id, MessageId(51));
}

#[test]
fn jump_affordance_tracks_distance_from_the_bottom() {
    let heights: Vec<(u64, usize)> = (1..=20).map(|id| (id, 2)).collect();
    let mut view = FakeViewport::new(heights, 0, 10);
    let max = anchor::max_scroll(&view);

    view.set_scroll_top(max);
    assert!(!anchor::show_jump_to_latest(&view));

    view.set_scroll_top(max - BOTTOM_AFFORDANCE_THRESHOLD - 1);
    assert!(anchor::show_jump_to_latest(&view));
}
