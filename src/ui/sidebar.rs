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

//! Conversation sidebar: search box, windowed list, pagination status.

use crate::api::types::{Conversation, MessageBody};
use crate::app::state::{App, Pane};
use crate::ui::theme;
use crate::ui::fit_text;
use chrono::Local;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

/// Rows consumed by the header (title, search, separator) and the status
/// line at the bottom.
const CHROME_ROWS: u16 = 4;

#[allow(clippy::cast_possible_truncation)]
pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
    if area.width == 0 || area.height < CHROME_ROWS {
        return;
    }
    app.rendered_sidebar_area = area;

    let list_rows = area.height.saturating_sub(CHROME_ROWS) as usize;
    app.sidebar_view_rows = list_rows.max(1);
    let count = app.conversations.conversations().len();
    app.sidebar_nav.clamp(count, app.sidebar_view_rows);

    let mut lines: Vec<Line<'static>> = Vec::new();

    // Title
    let total = app.conversations.cursor.total().map_or(String::new(), |t| format!(" ({t})"));
    lines.push(Line::from(Span::styled(
        format!("Conversations{total}"),
        Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
    )));

    // Search box
    let search_style = if app.focus == Pane::Sidebar {
        Style::default()
    } else {
        Style::default().fg(theme::DIM)
    };
    lines.push(Line::from(vec![
        Span::styled(format!("{} ", theme::SEARCH_CHAR), Style::default().fg(theme::ACCENT)),
        Span::styled(app.search_input.clone(), search_style),
    ]));
    lines.push(Line::from(Span::styled(
        theme::SEPARATOR_CHAR.repeat(area.width as usize),
        Style::default().fg(theme::DIM),
    )));

    // Windowed list
    let (start, end) = app.sidebar_nav.visible_range(count, app.sidebar_view_rows);
    for (offset, conversation) in
        app.conversations.conversations()[start..end].iter().enumerate()
    {
        let list_index = start + offset;
        lines.push(row_line(app, conversation, list_index, area.width as usize));
    }
    for _ in (end - start)..list_rows {
        lines.push(Line::default());
    }

    // Status line
    lines.push(status_line(app));

    frame.render_widget(Paragraph::new(lines), area);

    // The search box owns the terminal cursor while the sidebar has focus
    if app.focus == Pane::Sidebar && app.dialog.is_none() {
        let cursor_x = area.x + 2 + UnicodeWidthStr::width(app.search_input.as_str()) as u16;
        if cursor_x < area.right() {
            frame.set_cursor_position((cursor_x, area.y + 1));
        }
    }
}

fn row_line(app: &App, conversation: &Conversation, list_index: usize, width: usize) -> Line<'static> {
    let is_active = app.conversations.selected() == Some(&conversation.id);
    let is_highlighted = list_index == app.sidebar_nav.selected;

    let marker = if is_active { "▸ " } else { "  " };
    let seen_icon = if conversation.seen { "  " } else { "● " };

    let name_style = if is_highlighted {
        Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else if is_active {
        Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD)
    } else if conversation.seen {
        Style::default()
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let time = conversation
        .last_message
        .as_ref()
        .map(|m| m.date.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_default();

    // marker(2) + icon(2) + time(5) + one space of slack
    let name_width = width.saturating_sub(10).max(4);
    let preview_source = preview_text(conversation);
    let name = fit_text(&conversation.user_id.0, name_width / 2);
    let preview = fit_text(&preview_source, name_width.saturating_sub(name.chars().count()));

    Line::from(vec![
        Span::styled(marker.to_owned(), Style::default().fg(theme::ACCENT)),
        Span::styled(seen_icon.to_owned(), Style::default().fg(theme::UNSEEN)),
        Span::styled(name, name_style),
        Span::styled(format!(" {preview}"), Style::default().fg(theme::DIM)),
        Span::styled(format!(" {time}"), Style::default().fg(theme::DIM)),
    ])
}

fn preview_text(conversation: &Conversation) -> String {
    match conversation.last_message.as_ref().map(|m| &m.body) {
        Some(MessageBody::Text { content }) => content.replace('\n', " "),
        Some(MessageBody::File { file }) => {
            format!("{} {}", theme::ICON_FILE, file.file_name)
        }
        None => String::new(),
    }
}

fn status_line(app: &App) -> Line<'static> {
    if app.conversations.loading {
        return Line::from(Span::styled(
            format!("{} loading...", theme::spinner_char(app.spinner_frame)),
            Style::default().fg(theme::DIM),
        ));
    }
    if app.conversations.cursor.has_more() {
        return Line::from(Span::styled("↓ more", Style::default().fg(theme::DIM)));
    }
    Line::default()
}
