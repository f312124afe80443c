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

use crate::app::state::{App, Pane};
use crate::ui::theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

/// Horizontal padding to match the chat pane inset.
const INPUT_PAD: u16 = 2;

/// Prompt prefix width: "❯ " = 2 columns
const PROMPT_WIDTH: u16 = 2;

/// Maximum composer height so a long draft cannot eat the feed.
const MAX_INPUT_HEIGHT: u16 = 10;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let padded = Rect {
        x: area.x + INPUT_PAD,
        y: area.y,
        width: area.width.saturating_sub(INPUT_PAD * 2),
        height: area.height,
    };

    if app.input.is_empty() {
        let placeholder = if app.conversations.selected().is_some() {
            "Type a message... (/attach <path> sends a file)"
        } else {
            "Select a conversation to start typing"
        };
        let line = Line::from(vec![
            Span::styled(format!("{} ", theme::PROMPT_CHAR), Style::default().fg(theme::ACCENT)),
            Span::styled(placeholder, Style::default().fg(theme::DIM)),
        ]);
        frame.render_widget(Paragraph::new(line), padded);

        if app.focus == Pane::Compose && app.dialog.is_none() {
            frame.set_cursor_position((padded.x + PROMPT_WIDTH, padded.y));
        }
        return;
    }

    // Prompt on the first line, indent on continuation lines
    let lines: Vec<Line> = app
        .input
        .lines
        .iter()
        .enumerate()
        .map(|(row, text)| {
            let prefix = if row == 0 {
                Span::styled(format!("{} ", theme::PROMPT_CHAR), Style::default().fg(theme::ACCENT))
            } else {
                Span::raw("  ")
            };
            Line::from(vec![prefix, Span::raw(text.clone())])
        })
        .collect();

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, padded);

    if app.focus != Pane::Compose || app.dialog.is_some() {
        return;
    }

    // Place the terminal cursor accounting for visual wrapping.
    let content_width = padded.width.saturating_sub(PROMPT_WIDTH) as usize;
    if content_width == 0 {
        return;
    }

    let mut visual_row: u16 = 0;
    for row in 0..app.input.lines.len() {
        let line_chars = app.input.lines[row].chars().count();
        let wrapped_lines = ((line_chars + content_width) / content_width).max(1) as u16;

        if row == app.input.cursor_row {
            let cursor_col = app.input.cursor_col;
            let wrap_row = (cursor_col / content_width) as u16;
            let wrap_col = (cursor_col % content_width) as u16;

            let cursor_x = padded.x + PROMPT_WIDTH + wrap_col;
            let cursor_y = padded.y + visual_row + wrap_row;

            if cursor_x < padded.right() && cursor_y < padded.bottom() {
                frame.set_cursor_position((cursor_x, cursor_y));
            }
            return;
        }
        visual_row += wrapped_lines;
    }
}

/// Number of visual lines the composer occupies, for the layout.
pub fn visual_line_count(app: &App, area_width: u16) -> u16 {
    if app.input.is_empty() {
        return 1;
    }
    let content_width =
        area_width.saturating_sub(INPUT_PAD * 2).saturating_sub(PROMPT_WIDTH) as usize;
    if content_width == 0 {
        return app.input.line_count();
    }

    let mut total: u16 = 0;
    for line in &app.input.lines {
        let chars = line.chars().count();
        let wrapped = ((chars + content_width) / content_width).max(1) as u16;
        total = total.saturating_add(wrapped);
    }
    total.min(MAX_INPUT_HEIGHT)
}
