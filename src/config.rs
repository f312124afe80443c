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

//! Configuration: defaults → config file → env vars → CLI flags.
//!
//! The file lives at `~/.config/coachdesk/config.toml` (per-platform via
//! `dirs`). A commented-out default is generated on first run so operators
//! can discover the options.

use crate::Cli;
use crate::error::ConsoleError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    pub api_token: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatConfig {
    pub conversation_page_size: Option<u32>,
    pub message_page_size: Option<u32>,
    pub search_debounce_ms: Option<u64>,
}

pub const DEFAULT_CONVERSATION_PAGE_SIZE: u32 = 20;
pub const DEFAULT_MESSAGE_PAGE_SIZE: u32 = 30;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 700;

const SERVER_ENV: &str = "COACHDESK_SERVER";
const TOKEN_ENV: &str = "COACHDESK_TOKEN";

/// Concrete values after collapsing the override chain.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub api_token: String,
    pub conversation_page_size: u32,
    pub message_page_size: u32,
    pub search_debounce: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Path to the config file, or `None` when the platform config dir is unknown.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("coachdesk").join("config.toml"))
}

/// Load the config file, generating a commented default when it is missing.
pub fn load_config() -> Result<ConsoleConfig, ConfigError> {
    let Some(path) = config_path() else {
        tracing::warn!("could not determine config directory, using defaults");
        return Ok(ConsoleConfig::default());
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<ConsoleConfig, ConfigError> {
    if !path.exists() {
        tracing::info!("no config file at {}, generating default", path.display());
        generate_default_config(path);
        return Ok(ConsoleConfig::default());
    }

    let contents = fs::read_to_string(path)?;
    let config: ConsoleConfig = toml::from_str(&contents)?;
    tracing::info!("loaded config from {}", path.display());
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# coachdesk configuration
# All settings are optional. Override hierarchy:
# defaults -> this file -> COACHDESK_* env vars -> CLI flags.

# [server]
# base_url = "https://api.example.com/admin"
# api_token = "cd_..."              # Or set COACHDESK_TOKEN

# [chat]
# conversation_page_size = 20
# message_page_size = 30
# search_debounce_ms = 700
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        tracing::warn!("failed to create config directory: {e}");
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        tracing::warn!("failed to write default config: {e}");
    }
}

/// Collapse the override chain into concrete values. The server URL and
/// token are required; everything else has a default.
pub fn resolve(config: &ConsoleConfig, cli: &Cli) -> Result<ResolvedConfig, ConsoleError> {
    let base_url = cli
        .server
        .clone()
        .or_else(|| std::env::var(SERVER_ENV).ok())
        .or_else(|| config.server.base_url.clone())
        .ok_or(ConsoleError::ServerNotConfigured)?;

    let api_token = cli
        .token
        .clone()
        .or_else(|| std::env::var(TOKEN_ENV).ok())
        .or_else(|| config.server.api_token.clone())
        .ok_or(ConsoleError::TokenNotConfigured)?;

    Ok(ResolvedConfig {
        // Trailing slashes would double up when joining endpoint paths
        base_url: base_url.trim_end_matches('/').to_owned(),
        api_token,
        conversation_page_size: config
            .chat
            .conversation_page_size
            .unwrap_or(DEFAULT_CONVERSATION_PAGE_SIZE),
        message_page_size: config.chat.message_page_size.unwrap_or(DEFAULT_MESSAGE_PAGE_SIZE),
        search_debounce: Duration::from_millis(
            config.chat.search_debounce_ms.unwrap_or(DEFAULT_SEARCH_DEBOUNCE_MS),
        ),
    })
}
