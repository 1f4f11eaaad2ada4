//! LINE Messaging API client
//!
//! Communicates with LINE Messaging API

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info};

use crate::error::{LineError, Result};
use crate::types::*;

/// LINE accepts at most five messages per reply
pub const MAX_REPLY_MESSAGES: usize = 5;

/// Outbound side of the bot: replies and leaving chats
#[async_trait]
pub trait LineMessenger: Send + Sync {
    /// Reply to an event. A reply token can only be used once.
    async fn reply_message(&self, reply_token: &str, messages: Vec<MessageContent>) -> Result<()>;

    async fn leave_group(&self, group_id: &str) -> Result<()>;

    async fn leave_room(&self, room_id: &str) -> Result<()>;
}

/// LINE Messaging API client
#[derive(Clone)]
pub struct LineApiClient {
    client: Client,
    channel_access_token: String,
    base_url: String,
}

impl LineApiClient {
    /// Create a new LINE API client
    pub fn new(channel_access_token: &str) -> Result<Self> {
        Self::with_base_url(channel_access_token, "https://api.line.me/v2")
    }

    /// Create a client against a custom API endpoint
    pub fn with_base_url(channel_access_token: &str, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(LineError::HttpError)?;

        Ok(Self {
            client,
            channel_access_token: channel_access_token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Add authorization header
    fn add_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.bearer_auth(&self.channel_access_token)
    }

    /// Send a request and turn non-2xx responses into `ApiError`
    async fn send(&self, request: reqwest::RequestBuilder, action: &str) -> Result<()> {
        let response = self
            .add_auth(request)
            .send()
            .await
            .map_err(LineError::HttpError)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<LineApiResponse>(&error_text)
                .ok()
                .and_then(|r| r.message)
                .unwrap_or(error_text);
            error!("{} failed: {} - {}", action, status, detail);
            return Err(LineError::ApiError(format!("{}: {}", status, detail)));
        }

        Ok(())
    }
}

#[async_trait]
impl LineMessenger for LineApiClient {
    async fn reply_message(&self, reply_token: &str, messages: Vec<MessageContent>) -> Result<()> {
        if messages.is_empty() {
            return Ok(());
        }
        if messages.len() > MAX_REPLY_MESSAGES {
            return Err(LineError::ApiError(format!(
                "reply has {} messages, limit is {}",
                messages.len(),
                MAX_REPLY_MESSAGES
            )));
        }

        let url = format!("{}/bot/message/reply", self.base_url);

        let body = ReplyMessage {
            reply_token: reply_token.to_string(),
            messages,
        };

        debug!("Replying with {} message(s)", body.messages.len());

        self.send(self.client.post(&url).json(&body), "Reply message").await
    }

    async fn leave_group(&self, group_id: &str) -> Result<()> {
        let url = format!("{}/bot/group/{}/leave", self.base_url, group_id);

        self.send(self.client.post(&url), "Leave group").await?;

        info!("Left group: {}", group_id);
        Ok(())
    }

    async fn leave_room(&self, room_id: &str) -> Result<()> {
        let url = format!("{}/bot/room/{}/leave", self.base_url, room_id);

        self.send(self.client.post(&url), "Leave room").await?;

        info!("Left room: {}", room_id);
        Ok(())
    }
}
