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

/// Fatal startup/runtime failures with stable exit codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsoleError {
    #[error("server URL not configured")]
    ServerNotConfigured,
    #[error("API token not configured")]
    TokenNotConfigured,
    #[error("configuration file is invalid")]
    ConfigInvalid,
    #[error("HTTP client initialization failed")]
    HttpClientFailed,
}

impl ConsoleError {
    pub const SERVER_NOT_CONFIGURED_EXIT_CODE: i32 = 20;
    pub const TOKEN_NOT_CONFIGURED_EXIT_CODE: i32 = 21;
    pub const CONFIG_INVALID_EXIT_CODE: i32 = 22;
    pub const HTTP_CLIENT_FAILED_EXIT_CODE: i32 = 23;

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ServerNotConfigured => Self::SERVER_NOT_CONFIGURED_EXIT_CODE,
            Self::TokenNotConfigured => Self::TOKEN_NOT_CONFIGURED_EXIT_CODE,
            Self::ConfigInvalid => Self::CONFIG_INVALID_EXIT_CODE,
            Self::HttpClientFailed => Self::HTTP_CLIENT_FAILED_EXIT_CODE,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::ServerNotConfigured => {
                "No server URL configured. Pass --server or set [server].base_url in the config file."
            }
            Self::TokenNotConfigured => {
                "No API token configured. Pass --token or set [server].api_token in the config file."
            }
            Self::ConfigInvalid => "The configuration file could not be parsed.",
            Self::HttpClientFailed => "Failed to initialize the HTTP client.",
        }
    }
}

/// Failures crossing the REST boundary.
///
/// Every variant converts to an operator-readable toast via `user_message()`;
/// nothing from this module reaches the rendering layer as a raw error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server rejected the request with status {status}")]
    Server { status: u16, code: Option<String>, message: Option<String> },
    #[error("conversation not found")]
    ConversationNotFound,
    #[error("could not read attachment: {0}")]
    Attachment(String),
}

impl ApiError {
    /// True when the failure means "this conversation/user has no thread",
    /// which is a guided-recovery flow rather than an error toast.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::ConversationNotFound => true,
            Self::Server { status, code, .. } => {
                *status == 404 || code.as_deref() == Some("conversation_not_found")
            }
            _ => false,
        }
    }

    /// Translate to the toast text shown to the operator. Known server error
    /// codes get specific wording; everything else falls back to a generic
    /// message carrying whatever detail the server sent.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(err) if err.is_timeout() => {
                "The server took too long to respond.".to_owned()
            }
            Self::Transport(_) => "Could not reach the server.".to_owned(),
            Self::ConversationNotFound => "This conversation no longer exists.".to_owned(),
            Self::Attachment(detail) => format!("Could not read the attachment: {detail}"),
            Self::Server { status, code, message } => {
                if let Some(text) = code.as_deref().and_then(translate_server_code) {
                    return text.to_owned();
                }
                match message {
                    Some(detail) => format!("The server rejected the request: {detail}"),
                    None => format!("The server rejected the request (HTTP {status})."),
                }
            }
        }
    }
}

/// Known backend error codes → operator-facing text.
fn translate_server_code(code: &str) -> Option<&'static str> {
    match code {
        "conversation_not_found" => Some("This conversation no longer exists."),
        "user_not_found" => Some("No client with that id exists."),
        "file_too_large" => Some("The attachment exceeds the size limit."),
        "unsupported_file_type" => Some("That file type cannot be sent."),
        "token_expired" | "unauthorized" => {
            Some("Your session has expired. Restart with a fresh token.")
        }
        _ => None,
    }
}
