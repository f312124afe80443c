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

mod chat;
mod dialog;
mod input;
mod layout;
mod sidebar;
pub mod theme;

use crate::app::state::{App, Pane, ToastLevel};
use crate::chat::feed::FeedPhase;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn render(frame: &mut Frame, app: &mut App) {
    let frame_area = frame.area();
    // Measure the composer against the right column's width, which the
    // provisional layout provides.
    let provisional = layout::compute(frame_area, 1);
    let input_lines = input::visual_line_count(app, provisional.input.width);
    let areas = layout::compute(frame_area, input_lines);

    if areas.sidebar.width > 0 {
        sidebar::render(frame, areas.sidebar, app);
        render_vertical_separator(frame, areas.sidebar_sep);
    }

    chat::render(frame, areas.chat, app);
    render_separator(frame, areas.input_sep);
    input::render(frame, areas.input, app);

    if let Some(footer_area) = areas.footer {
        render_footer(frame, footer_area, app);
    }

    // Modal overlay last, above everything
    if app.dialog.is_some() {
        dialog::render(frame, frame_area, app);
    }
}

const FOOTER_PAD: u16 = 2;

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let padded = Rect {
        x: area.x + FOOTER_PAD,
        y: area.y,
        width: area.width.saturating_sub(FOOTER_PAD * 2),
        height: area.height,
    };

    let hints = match app.focus {
        Pane::Sidebar => "Tab compose  ↑↓ move  Enter open  type to search",
        Pane::Compose => "Tab list  Enter send  PgUp/PgDn scroll  Ctrl+J latest  Ctrl+C quit",
    };
    let left = Line::from(Span::styled(hints, Style::default().fg(theme::DIM)));

    let right_item = footer_status(app);

    let half = padded.width / 2;
    let left_area = Rect { width: half, ..padded };
    let right_area = Rect { x: padded.x + half, width: padded.width - half, ..padded };

    frame.render_widget(Paragraph::new(left), left_area);
    if let Some((text, style)) = right_item
        && let Some(fitted) = fit_right_text(&text, usize::from(right_area.width))
    {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(fitted, style))).alignment(Alignment::Right),
            right_area,
        );
    }
}

/// Right footer cell: an active toast wins, otherwise in-flight status.
fn footer_status(app: &App) -> Option<(String, Style)> {
    if let Some(toast) = &app.toast {
        let style = match toast.level {
            ToastLevel::Error => Style::default().fg(theme::ERROR),
            ToastLevel::Info => Style::default().fg(theme::ACCENT),
        };
        return Some((toast.text.clone(), style));
    }

    let spinner = theme::spinner_char(app.spinner_frame);
    if app.outbox.is_sending() {
        return Some((format!("{spinner} sending..."), Style::default().fg(theme::DIM)));
    }
    if app.feed.phase() == FeedPhase::LoadingOlder {
        return Some((format!("{spinner} fetching history..."), Style::default().fg(theme::DIM)));
    }
    if app.conversations.loading {
        return Some((format!("{spinner} loading conversations..."), Style::default().fg(theme::DIM)));
    }
    None
}

fn render_separator(frame: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }
    let sep_str = theme::SEPARATOR_CHAR.repeat(area.width as usize);
    let line = Line::from(Span::styled(sep_str, Style::default().fg(theme::DIM)));
    frame.render_widget(Paragraph::new(line), area);
}

fn render_vertical_separator(frame: &mut Frame, area: Rect) {
    if area.width == 0 {
        return;
    }
    let lines: Vec<Line> = (0..area.height)
        .map(|_| {
            Line::from(Span::styled(
                theme::VERTICAL_SEPARATOR_CHAR,
                Style::default().fg(theme::DIM),
            ))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

/// Truncate to a display width with a `...` tail.
pub(crate) fn fit_text(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_owned();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }

    let mut fitted = String::new();
    let mut width: usize = 0;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width.saturating_add(ch_width).saturating_add(3) > max_width {
            break;
        }
        fitted.push(ch);
        width = width.saturating_add(ch_width);
    }
    fitted.push_str("...");
    fitted
}

fn fit_right_text(text: &str, max_width: usize) -> Option<String> {
    if max_width == 0 || text.trim().is_empty() {
        return None;
    }
    Some(fit_text(text, max_width))
}
