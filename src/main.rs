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

use clap::Parser;
use coachdesk::Cli;
use coachdesk::api::types::UserId;
use coachdesk::api::ChatApi;
use coachdesk::app::App;
use coachdesk::config;
use coachdesk::error::ConsoleError;
use std::fs::OpenOptions;
use std::rc::Rc;

#[allow(clippy::exit)]
fn main() {
    if let Err(err) = run() {
        if let Some(console_error) = extract_console_error(&err) {
            eprintln!("{}", console_error.user_message());
            std::process::exit(console_error.exit_code());
        }
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let loaded = config::load_config().map_err(|err| {
        eprintln!("{err}");
        anyhow::Error::new(ConsoleError::ConfigInvalid)
    })?;
    let resolved = config::resolve(&loaded, &cli).map_err(anyhow::Error::new)?;

    let api = ChatApi::new(resolved.base_url.clone(), &resolved.api_token)
        .map_err(anyhow::Error::new)?;

    let rt = tokio::runtime::Runtime::new()?;
    let local_set = tokio::task::LocalSet::new();

    rt.block_on(local_set.run_until(async move {
        let mut app = App::new(
            Some(Rc::new(api)),
            resolved.conversation_page_size,
            resolved.message_page_size,
            resolved.search_debounce,
        );

        // Page 1 of the conversation list loads immediately; a --user deep
        // link resolves in parallel and selects (or offers to create) the
        // thread when it lands.
        coachdesk::app::load_conversations(&mut app, false);
        if let Some(user) = cli.user.as_deref() {
            coachdesk::app::resolve_deep_link(&mut app, UserId::from(user));
        }

        coachdesk::app::run_tui(&mut app).await
    }))
}

fn extract_console_error(err: &anyhow::Error) -> Option<ConsoleError> {
    err.chain().find_map(|cause| cause.downcast_ref::<ConsoleError>().cloned())
}

fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let Some(path) = cli.log_file.as_ref() else {
        if std::env::var_os("RUST_LOG").is_some() {
            eprintln!(
                "RUST_LOG is set, but tracing is disabled without --log-file <PATH>. \
Use --log-file to enable diagnostics."
            );
        }
        return Ok(());
    };

    let directives = cli
        .log_filter
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_owned());
    let filter = tracing_subscriber::EnvFilter::try_new(directives.as_str())
        .map_err(|e| anyhow::anyhow!("invalid tracing filter `{directives}`: {e}"))?;

    let mut options = OpenOptions::new();
    options.create(true).write(true);
    if cli.log_append {
        options.append(true);
    } else {
        options.truncate(true);
    }
    let file = options
        .open(path)
        .map_err(|e| anyhow::anyhow!("failed to open log file {}: {e}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_file = %path.display(),
        log_filter = %directives,
        "tracing enabled"
    );

    Ok(())
}
