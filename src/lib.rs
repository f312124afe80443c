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

pub mod api;
pub mod app;
pub mod chat;
pub mod config;
pub mod error;
pub mod ui;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "coachdesk", about = "Terminal messaging console for CoachDesk staff")]
pub struct Cli {
    /// Server base URL (overrides the config file)
    #[arg(long)]
    pub server: Option<String>,

    /// API bearer token (overrides the config file)
    #[arg(long)]
    pub token: Option<String>,

    /// Open the conversation with this client id on startup
    #[arg(long, short)]
    pub user: Option<String>,

    /// Write diagnostics to this file (tracing is disabled without it)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Tracing filter directives, e.g. "info,coachdesk=debug"
    #[arg(long)]
    pub log_filter: Option<String>,

    /// Append to the log file instead of truncating it
    #[arg(long)]
    pub log_append: bool,
}
