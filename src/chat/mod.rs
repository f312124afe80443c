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

//! The conversation/message pagination engine.
//!
//! Everything in this module is synchronous, owns no sockets, and is driven
//! entirely by the event loop in `crate::app`. Network completions re-enter
//! through controller methods that re-check their originating context
//! (conversation id, search generation) before touching state.

pub mod anchor;
pub mod conversations;
pub mod cursor;
pub mod debounce;
pub mod feed;
pub mod outbox;

pub use anchor::{ScrollAnchor, Viewport};
pub use conversations::ConversationList;
pub use cursor::PageCursor;
pub use debounce::Debouncer;
pub use feed::{FeedPhase, MessageFeed};
pub use outbox::{Outbox, OutboxEntry, OutboxState};
