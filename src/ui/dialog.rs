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

//! Centered modal for the start-conversation recovery flow.

use crate::app::dialog::DialogFlow;
use crate::app::state::App;
use crate::ui::theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

const BORDER_COLOR: Color = Color::Rgb(100, 100, 100);

pub fn render(frame: &mut Frame, full_area: Rect, app: &App) {
    let Some(flow) = &app.dialog else { return };

    match flow {
        DialogFlow::ConfirmStart { user_id, accept_selected } => {
            let area = centered(full_area, 54, 7);
            frame.render_widget(Clear, area);

            let block = titled_block("New conversation");
            let mut lines: Vec<Line> = Vec::new();
            lines.push(Line::default());
            lines.push(Line::from(Span::raw(format!(
                " No conversation with client {user_id} yet."
            ))));
            lines.push(Line::default());
            lines.push(Line::from(vec![
                option_span("Start conversation", *accept_selected),
                Span::raw("   "),
                option_span("Cancel", !*accept_selected),
            ]));
            lines.push(Line::from(Span::styled(
                " ←→ select  enter confirm  esc cancel",
                Style::default().fg(theme::DIM),
            )));

            frame.render_widget(Paragraph::new(lines).block(block), area);
        }
        DialogFlow::ComposeFirst { user_id, input } => {
            let area = centered(full_area, 60, 8);
            frame.render_widget(Clear, area);

            let block = titled_block("First message");
            let mut lines: Vec<Line> = Vec::new();
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                format!(" To client {user_id}:"),
                Style::default().fg(theme::DIM),
            )));
            let first_line = input.lines.first().cloned().unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {} ", theme::PROMPT_CHAR),
                    Style::default().fg(theme::ACCENT),
                ),
                Span::raw(first_line),
            ]));
            for continuation in input.lines.iter().skip(1) {
                lines.push(Line::from(Span::raw(format!("   {continuation}"))));
            }
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                " enter send  shift+enter newline  esc cancel",
                Style::default().fg(theme::DIM),
            )));

            frame.render_widget(Paragraph::new(lines).block(block), area);

            // Cursor on the active composer row (" ❯ " / "   " prefix = 3 cols)
            let cursor_row = input.cursor_row.min(input.lines.len().saturating_sub(1));
            let typed = &input.lines[cursor_row][..byte_prefix(&input.lines[cursor_row], input.cursor_col)];
            let cursor_x = area.x + 3 + UnicodeWidthStr::width(typed) as u16 + 1;
            let cursor_y = area.y + 3 + cursor_row as u16;
            if cursor_x < area.right() && cursor_y < area.bottom() {
                frame.set_cursor_position((cursor_x, cursor_y));
            }
        }
    }
}

fn titled_block(title: &str) -> Block<'_> {
    Block::new()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(Line::from(vec![
            Span::raw(" "),
            Span::styled(title, Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD)),
            Span::raw(" "),
        ]))
}

fn option_span(label: &str, selected: bool) -> Span<'static> {
    if selected {
        Span::styled(
            format!(" ▸ {label} "),
            Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(format!("   {label} "), Style::default().fg(Color::Gray))
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width.saturating_sub(2));
    let h = height.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

fn byte_prefix(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map(|(i, _)| i).unwrap_or(s.len())
}
