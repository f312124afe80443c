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

//! Message feed rendering.
//!
//! Lines are pre-wrapped here (no widget-level wrapping) so the per-message
//! line index is exact; that index backs the `Viewport` the scroll-anchor
//! engine runs against. This function also performs the per-frame scroll
//! reconciliation: anchor restore after an older-page merge, bottom pinning,
//! near-top anchor capture, and the jump-to-latest affordance.

use crate::api::types::{Message, MessageBody, MessageId};
use crate::app::state::App;
use crate::chat::anchor::{self, Viewport};
use crate::chat::feed::FeedPhase;
use crate::chat::outbox::OutboxState;
use crate::ui::theme;
use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Paragraph;

/// Per-message geometry for the current frame: `(id, top_row, height)`.
#[derive(Debug, Default)]
struct LineIndex {
    entries: Vec<(MessageId, usize, usize)>,
    content_height: usize,
}

impl LineIndex {
    fn push(&mut self, id: MessageId, top: usize, height: usize) {
        self.entries.push((id, top, height));
    }

    fn element_top(&self, id: MessageId) -> Option<usize> {
        self.entries.iter().find(|(i, _, _)| *i == id).map(|(_, top, _)| *top)
    }

    fn element_height(&self, id: MessageId) -> Option<usize> {
        self.entries.iter().find(|(i, _, _)| *i == id).map(|(_, _, height)| *height)
    }
}

/// The terminal-side [`Viewport`]: scroll offset plus the frame's line index.
struct FeedView<'a> {
    scroll_top: usize,
    height: usize,
    index: &'a LineIndex,
}

impl Viewport for FeedView<'_> {
    fn scroll_top(&self) -> usize {
        self.scroll_top
    }
    fn viewport_height(&self) -> usize {
        self.height
    }
    fn content_height(&self) -> usize {
        self.index.content_height
    }
    fn element_top(&self, id: MessageId) -> Option<usize> {
        self.index.element_top(id)
    }
    fn element_height(&self, id: MessageId) -> Option<usize> {
        self.index.element_height(id)
    }
    fn set_scroll_top(&mut self, top: usize) {
        self.scroll_top = top;
    }
}

#[allow(clippy::cast_possible_truncation)]
pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
    app.rendered_chat_area = area;
    app.chat_view_rows = area.height as usize;

    let padded = Rect {
        x: area.x + 1,
        y: area.y,
        width: area.width.saturating_sub(2),
        height: area.height,
    };
    let content_width = padded.width as usize;
    if content_width == 0 || padded.height == 0 {
        return;
    }

    let (lines, index) = build_feed_lines(app, content_width);
    let viewport_height = padded.height as usize;

    let mut view = FeedView { scroll_top: app.scroll.top, height: viewport_height, index: &index };

    // An older page merged since the last frame: re-seat the captured anchor
    // against the new (longer) content before anything else reads scroll.
    if let Some(pending) = app.scroll.pending_anchor.take() {
        anchor::restore(&mut view, pending);
    }

    let max_scroll = anchor::max_scroll(&view);
    if app.scroll.stick_to_bottom {
        view.scroll_top = max_scroll;
    }
    view.scroll_top = view.scroll_top.min(max_scroll);
    if view.scroll_top >= max_scroll {
        // Scrolled (back) to the end — re-engage bottom pinning
        app.scroll.stick_to_bottom = true;
    }

    maybe_capture_anchor(app, &view);

    app.scroll.top = view.scroll_top;
    app.scroll.show_jump_affordance = anchor::show_jump_to_latest(&view);

    let paragraph = Paragraph::new(Text::from(lines));
    frame.render_widget(paragraph.scroll((view.scroll_top as u16, 0)), padded);

    if app.scroll.show_jump_affordance {
        render_jump_affordance(frame, area);
    }
}

/// At the top edge with history left to load: capture the anchor now (while
/// the geometry still reflects the pre-merge content) and hand it to the
/// event loop, which issues the guarded backward fetch.
fn maybe_capture_anchor(app: &mut App, view: &FeedView<'_>) {
    if app.feed.phase() != FeedPhase::Ready
        || !app.feed.has_more_history()
        || app.scroll.wants_older.is_some()
        || app.scroll.stick_to_bottom
        || view.content_height() <= view.viewport_height()
        || !anchor::near_top(view)
    {
        return;
    }
    let ids: Vec<MessageId> = app.feed.messages().iter().map(|m| m.id).collect();
    if let Some(captured) = anchor::capture(view, &ids) {
        app.scroll.wants_older = Some(captured);
    }
}

#[allow(clippy::cast_possible_truncation)]
fn render_jump_affordance(frame: &mut Frame, area: Rect) {
    let label = " ↓ latest (Ctrl+J) ";
    let width = (label.chars().count() as u16).min(area.width);
    let overlay = Rect {
        x: area.right().saturating_sub(width + 1),
        y: area.bottom().saturating_sub(1),
        width,
        height: 1,
    };
    let line = Line::from(Span::styled(
        label,
        Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD | Modifier::REVERSED),
    ));
    frame.render_widget(Paragraph::new(line), overlay);
}

// ---------------------------------------------------------------------------
// Line building
// ---------------------------------------------------------------------------

fn build_feed_lines(app: &App, width: usize) -> (Vec<Line<'static>>, LineIndex) {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut index = LineIndex::default();

    if app.feed.conversation_id().is_none() {
        let welcome = empty_state_lines();
        index.content_height = welcome.len();
        return (welcome, index);
    }

    if app.feed.phase() == FeedPhase::LoadingInitial {
        lines.push(Line::default());
        lines.push(
            Line::from(Span::styled(
                format!("{} loading conversation...", theme::spinner_char(app.spinner_frame)),
                Style::default().fg(theme::DIM),
            ))
            .alignment(Alignment::Center),
        );
        index.content_height = lines.len();
        return (lines, index);
    }

    for (day, messages) in app.feed.grouped_by_day() {
        lines.push(
            Line::from(Span::styled(
                format!("── {} ──", day.format("%d %b %Y")),
                Style::default().fg(theme::DIM),
            ))
            .alignment(Alignment::Center),
        );
        lines.push(Line::default());

        for message in messages {
            let top = lines.len();
            push_message_lines(&mut lines, message, width);
            index.push(message.id, top, lines.len() - top);
        }
    }

    if app.feed.messages().is_empty() {
        lines.push(Line::from(Span::styled(
            "No messages yet.",
            Style::default().fg(theme::DIM),
        )));
        lines.push(Line::default());
    }

    push_outbox_lines(&mut lines, app, width);

    index.content_height = lines.len();
    (lines, index)
}

fn push_message_lines(lines: &mut Vec<Line<'static>>, message: &Message, width: usize) {
    let staff = message.is_from_staff();
    let (name, color) = if staff {
        (message.from_admin_id.clone().unwrap_or_else(|| "staff".to_owned()), theme::ROLE_STAFF)
    } else {
        ("client".to_owned(), theme::ROLE_CLIENT)
    };
    let alignment = if staff { Alignment::Right } else { Alignment::Left };
    let time = message.date.with_timezone(&Local).format("%H:%M");

    lines.push(
        Line::from(vec![
            Span::styled(name, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {time}"), Style::default().fg(theme::DIM)),
        ])
        .alignment(alignment),
    );

    match &message.body {
        MessageBody::Text { content } => {
            for chunk in wrap_text(content, width.saturating_sub(4).max(16)) {
                lines.push(Line::from(Span::raw(chunk)).alignment(alignment));
            }
        }
        MessageBody::File { file } => {
            lines.push(
                Line::from(vec![
                    Span::styled(
                        format!("{} {}", theme::ICON_FILE, file.file_name),
                        Style::default().fg(color),
                    ),
                    Span::styled(format!("  {}", file.mime_type), Style::default().fg(theme::DIM)),
                ])
                .alignment(alignment),
            );
        }
    }
    lines.push(Line::default());
}

/// Optimistic entries render after the confirmed messages, staff-aligned,
/// visually distinct per state so a failure can never pass for a sent
/// message.
fn push_outbox_lines(lines: &mut Vec<Line<'static>>, app: &App, width: usize) {
    let Some(conversation_id) = app.feed.conversation_id() else { return };
    for entry in app.outbox.entries() {
        match &entry.target {
            crate::api::types::SendTarget::Conversation(id) if id == conversation_id => {}
            _ => continue,
        }

        let (status, style) = match entry.state {
            OutboxState::Sending => (
                format!("{} sending", theme::spinner_char(app.spinner_frame)),
                Style::default().fg(theme::DIM).add_modifier(Modifier::ITALIC),
            ),
            OutboxState::Failed => (
                format!("{} failed — Ctrl+D to dismiss", theme::ICON_FAILED),
                Style::default().fg(theme::ERROR),
            ),
        };

        lines.push(Line::from(Span::styled(status, style)).alignment(Alignment::Right));
        match &entry.body {
            MessageBody::Text { content } => {
                for chunk in wrap_text(&content, width.saturating_sub(4).max(16)) {
                    lines.push(
                        Line::from(Span::styled(chunk, Style::default().fg(theme::DIM)))
                            .alignment(Alignment::Right),
                    );
                }
            }
            MessageBody::File { file } => {
                lines.push(
                    Line::from(Span::styled(
                        format!("{} {}", theme::ICON_FILE, file.file_name),
                        Style::default().fg(theme::DIM),
                    ))
                    .alignment(Alignment::Right),
                );
            }
        }
        lines.push(Line::default());
    }
}

fn empty_state_lines() -> Vec<Line<'static>> {
    let dim = Style::default().fg(theme::DIM);
    vec![
        Line::default(),
        Line::from(Span::styled("CoachDesk", Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD)))
            .alignment(Alignment::Center),
        Line::from(Span::styled("Select a conversation to start chatting.", dim))
            .alignment(Alignment::Center),
        Line::default(),
        Line::from(Span::styled("Tab switch panes · Enter open · type to search", dim))
            .alignment(Alignment::Center),
    ]
}

/// Greedy word wrap on display width. Words longer than the width are split
/// hard so a pathological token cannot blow up the line index.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    use unicode_width::UnicodeWidthChar;
    use unicode_width::UnicodeWidthStr;

    let width = width.max(1);
    let mut wrapped = Vec::new();
    for raw_line in text.lines() {
        if raw_line.is_empty() {
            wrapped.push(String::new());
            continue;
        }
        let mut current = String::new();
        let mut current_width = 0usize;
        for word in raw_line.split_whitespace() {
            let word_width = UnicodeWidthStr::width(word);
            let sep = usize::from(!current.is_empty());
            if current_width + sep + word_width <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += sep + word_width;
                continue;
            }
            if !current.is_empty() {
                wrapped.push(std::mem::take(&mut current));
                current_width = 0;
            }
            if word_width <= width {
                current.push_str(word);
                current_width = word_width;
            } else {
                // Hard-split an overlong word
                for c in word.chars() {
                    let char_width = UnicodeWidthChar::width(c).unwrap_or(0);
                    if current_width + char_width > width && !current.is_empty() {
                        wrapped.push(std::mem::take(&mut current));
                        current_width = 0;
                    }
                    current.push(c);
                    current_width += char_width;
                }
            }
        }
        if !current.is_empty() {
            wrapped.push(current);
        }
    }
    if wrapped.is_empty() {
        wrapped.push(String::new());
    }
    wrapped
}
