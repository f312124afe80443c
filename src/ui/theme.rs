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

use ratatui::style::Color;

// Accent
pub const ACCENT: Color = Color::Rgb(16, 185, 129);

// UI chrome
pub const DIM: Color = Color::DarkGray;
pub const PROMPT_CHAR: &str = "❯";
pub const SEPARATOR_CHAR: &str = "─";
pub const VERTICAL_SEPARATOR_CHAR: &str = "│";
pub const SEARCH_CHAR: &str = "⌕";

// Feed roles: client messages left/cyan, staff messages right/accent
pub const ROLE_CLIENT: Color = Color::Cyan;
pub const ROLE_STAFF: Color = ACCENT;

// Sidebar markers
pub const UNSEEN: Color = Color::Yellow;
pub const ICON_UNSEEN: &str = "●";

// Send/feed status
pub const ERROR: Color = Color::Red;
pub const ICON_FILE: &str = "⎙";
pub const ICON_FAILED: &str = "✗";

pub const SPINNER_FRAMES: &[char] = &[
    '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}', '\u{2827}',
    '\u{2807}', '\u{280F}',
];

/// Current spinner glyph for a frame counter.
#[must_use]
pub fn spinner_char(frame: usize) -> char {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}
