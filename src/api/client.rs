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

//! HTTP client for the admin REST API.
//!
//! Auth is a bearer token installed in the default headers at construction;
//! every mutating request carries an `x-request-id` for server-side
//! correlation.

use crate::api::types::{
    Conversation, ConversationId, ConversationPage, ErrorBody, Message, MessageId, MessagePage,
    SendOutcome, SendTarget, UserId,
};
use crate::error::{ApiError, ConsoleError};
use reqwest::Response;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use uuid::Uuid;

pub struct ChatApi {
    client: reqwest::Client,
    base_url: String,
}

impl ChatApi {
    pub fn new(base_url: String, token: &str) -> Result<Self, ConsoleError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ConsoleError::TokenNotConfigured)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .build()
            .map_err(|_| ConsoleError::HttpClientFailed)?;

        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    /// Paginated, searchable conversation list.
    pub async fn list_conversations(
        &self,
        search: &str,
        page: u32,
        page_size: u32,
    ) -> Result<ConversationPage, ApiError> {
        let url = format!("{}/conversations", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("search", search.to_owned()),
                ("page", page.to_string()),
                ("pageSize", page_size.to_string()),
            ])
            .send()
            .await?;
        decode(response, "conversation list").await
    }

    /// Messages for one conversation, newest-first from the server.
    /// `before_id` bounds a backward page; `None` fetches the latest page.
    /// Returned ascending by id, ready for the feed cache.
    pub async fn fetch_messages(
        &self,
        conversation_id: &ConversationId,
        before_id: Option<MessageId>,
        page_size: u32,
    ) -> Result<Vec<Message>, ApiError> {
        let url = format!("{}/conversations/{}/messages", self.base_url, conversation_id);
        let mut query = vec![("pageSize", page_size.to_string())];
        if let Some(id) = before_id {
            query.push(("beforeId", id.to_string()));
        }
        let response = self.client.get(&url).query(&query).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::ConversationNotFound);
        }
        let page: MessagePage = decode(response, "message page").await?;
        let mut messages = page.messages;
        messages.reverse();
        Ok(messages)
    }

    /// The existing thread for a client, if any. Used by deep links.
    pub async fn find_user_conversation(
        &self,
        user_id: &UserId,
    ) -> Result<Conversation, ApiError> {
        let url = format!("{}/users/{}/conversation", self.base_url, user_id);
        let response = self.client.get(&url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::ConversationNotFound);
        }
        decode(response, "user conversation lookup").await
    }

    pub async fn send_text(
        &self,
        target: &SendTarget,
        content: &str,
    ) -> Result<SendOutcome, ApiError> {
        match target {
            SendTarget::Conversation(id) => {
                let url = format!("{}/conversations/{}/messages", self.base_url, id);
                let response = self
                    .client
                    .post(&url)
                    .header("x-request-id", Uuid::new_v4().to_string())
                    .json(&serde_json::json!({ "type": "text", "content": content }))
                    .send()
                    .await?;
                let message: Message = decode(response, "text send").await?;
                Ok(SendOutcome { message, conversation: None })
            }
            SendTarget::User(user_id) => {
                let url = format!("{}/messages", self.base_url);
                let response = self
                    .client
                    .post(&url)
                    .header("x-request-id", Uuid::new_v4().to_string())
                    .json(&serde_json::json!({
                        "userId": user_id,
                        "type": "text",
                        "content": content,
                    }))
                    .send()
                    .await?;
                decode(response, "user-addressed text send").await
            }
        }
    }

    /// Multipart file send. The backend stores the file with the storage
    /// collaborator and returns the created message referencing the signed
    /// URL.
    pub async fn send_file(
        &self,
        target: &SendTarget,
        file_name: &str,
        bytes: Vec<u8>,
        mime_type: &str,
    ) -> Result<SendOutcome, ApiError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_owned())
            .mime_str(mime_type)?;
        let mut form = reqwest::multipart::Form::new().part("file", part);

        let url = match target {
            SendTarget::Conversation(id) => {
                format!("{}/conversations/{}/messages", self.base_url, id)
            }
            SendTarget::User(user_id) => {
                form = form.text("userId", user_id.to_string());
                format!("{}/messages", self.base_url)
            }
        };

        let response = self
            .client
            .post(&url)
            .header("x-request-id", Uuid::new_v4().to_string())
            .multipart(form)
            .send()
            .await?;

        match target {
            SendTarget::Conversation(_) => {
                let message: Message = decode(response, "file send").await?;
                Ok(SendOutcome { message, conversation: None })
            }
            SendTarget::User(_) => decode(response, "user-addressed file send").await,
        }
    }

    /// Idempotent read acknowledgement.
    pub async fn mark_seen(&self, conversation_id: &ConversationId) -> Result<(), ApiError> {
        let url = format!("{}/conversations/{}/seen", self.base_url, conversation_id);
        let response = self
            .client
            .post(&url)
            .header("x-request-id", Uuid::new_v4().to_string())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from(response, "seen ack").await);
        }
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, ApiError> {
    if !response.status().is_success() {
        return Err(error_from(response, what).await);
    }
    Ok(response.json::<T>().await?)
}

/// Decode the server's `{ code, message }` error body, tolerating bodies
/// that are not JSON at all.
async fn error_from(response: Response, what: &str) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let (code, message) = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| (b.code, b.message))
        .unwrap_or((None, None));
    tracing::warn!("{what} failed: HTTP {status}, code={code:?}");
    ApiError::Server { status, code, message }
}
