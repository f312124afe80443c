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

use ratatui::layout::{Constraint, Layout, Rect};

/// Sidebar column width when the terminal is wide enough for two panes.
const SIDEBAR_WIDTH: u16 = 32;
/// Below this width the sidebar is dropped and the chat takes everything.
const TWO_PANE_MIN_WIDTH: u16 = 64;
/// Below this height the footer is dropped.
const FOOTER_MIN_HEIGHT: u16 = 8;

pub struct AppLayout {
    /// Conversation list column; zero-width on narrow terminals.
    pub sidebar: Rect,
    pub sidebar_sep: Rect,
    pub chat: Rect,
    pub input_sep: Rect,
    pub input: Rect,
    pub footer: Option<Rect>,
}

pub fn compute(area: Rect, input_lines: u16) -> AppLayout {
    let input_height = input_lines.max(1);
    let zero = Rect::new(area.x, area.y, 0, area.height);

    let (sidebar, sidebar_sep, right) = if area.width >= TWO_PANE_MIN_WIDTH {
        let [sidebar, sep, right] = Layout::horizontal([
            Constraint::Length(SIDEBAR_WIDTH),
            Constraint::Length(1),
            Constraint::Min(20),
        ])
        .areas(area);
        (sidebar, sep, right)
    } else {
        (zero, zero, area)
    };

    if area.height < FOOTER_MIN_HEIGHT {
        let [chat, input_sep, input] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(input_height),
        ])
        .areas(right);
        AppLayout { sidebar, sidebar_sep, chat, input_sep, input, footer: None }
    } else {
        let [chat, input_sep, input, footer] = Layout::vertical([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(input_height),
            Constraint::Length(1),
        ])
        .areas(right);
        AppLayout { sidebar, sidebar_sep, chat, input_sep, input, footer: Some(footer) }
    }
}
