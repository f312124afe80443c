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

pub(crate) mod dialog;
mod events;
mod input;
pub(crate) mod state;
mod tasks;

// Re-export the public surface so `crate::app::App` etc. keep working.
pub use dialog::{DialogFlow, ListNav};
pub use events::{
    NetEvent, handle_net_event, handle_terminal_event, select_conversation, submit_input,
    submit_text,
};
pub use input::InputState;
pub use state::{App, FeedScroll, Pane, TOAST_TTL, Toast, ToastLevel};
pub use tasks::{load_conversations, resolve_deep_link};

use crossterm::event::EventStream;
use futures::{FutureExt as _, StreamExt};
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// TUI event loop
// ---------------------------------------------------------------------------

pub async fn run_tui(app: &mut App) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    // Bracketed paste and mouse capture (ignore errors on unsupported terminals)
    let _ = crossterm::execute!(
        std::io::stdout(),
        crossterm::event::EnableBracketedPaste,
        crossterm::event::EnableMouseCapture,
    );

    let mut terminal_events = EventStream::new();
    let tick_duration = Duration::from_millis(33);
    let mut last_render = Instant::now();

    loop {
        // Phase 1: wait for at least one event or the next frame tick
        let time_to_next = tick_duration.saturating_sub(last_render.elapsed());
        tokio::select! {
            Some(Ok(event)) = terminal_events.next() => {
                events::handle_terminal_event(app, event);
            }
            Some(event) = app.event_rx.recv() => {
                events::handle_net_event(app, event);
            }
            () = tokio::time::sleep(time_to_next) => {}
        }

        // Phase 2: drain all remaining queued events (non-blocking)
        loop {
            // Terminal events first (keeps typing responsive)
            if let Some(Some(Ok(event))) = terminal_events.next().now_or_never() {
                events::handle_terminal_event(app, event);
                continue;
            }
            match app.event_rx.try_recv() {
                Ok(event) => events::handle_net_event(app, event),
                Err(_) => break,
            }
        }

        if app.should_quit {
            break;
        }

        // Phase 3: timers and deferred work, then render once
        let now = Instant::now();
        if app.conversations.debounce.fire_if_due(now) {
            tasks::load_conversations(app, false);
        }
        // The previous render may have captured an anchor at the top edge
        tasks::load_older(app);
        if app.toast.as_ref().is_some_and(|t| t.shown_at.elapsed() > TOAST_TTL) {
            app.toast = None;
        }
        if app.is_busy() {
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
        }
        if app.force_redraw {
            terminal.clear()?;
            app.force_redraw = false;
        }
        terminal.draw(|f| crate::ui::render(f, app))?;
        last_render = Instant::now();
    }

    // Restore terminal
    let _ = crossterm::execute!(
        std::io::stdout(),
        crossterm::event::DisableBracketedPaste,
        crossterm::event::DisableMouseCapture,
    );
    ratatui::restore();

    Ok(())
}
