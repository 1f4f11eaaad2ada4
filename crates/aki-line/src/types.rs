//! LINE Messaging API types

use serde::{Deserialize, Serialize};

use crate::error::{LineError, Result};

/// Event types this bot understands
pub const KNOWN_EVENT_TYPES: [&str; 5] = ["message", "follow", "unfollow", "join", "leave"];

/// LINE source (user, group, or room)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LineSource {
    User {
        #[serde(rename = "userId")]
        user_id: String,
    },
    Group {
        #[serde(rename = "groupId")]
        group_id: String,
        #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
        user_id: Option<String>,
    },
    Room {
        #[serde(rename = "roomId")]
        room_id: String,
        #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
        user_id: Option<String>,
    },
}

impl LineSource {
    /// Key of the sender's game session.
    ///
    /// Group and room members who have not consented to profile access
    /// arrive without a user id; they share the group's (or room's) session.
    pub fn session_key(&self) -> &str {
        match self {
            Self::User { user_id } => user_id,
            Self::Group { group_id, user_id } => user_id.as_deref().unwrap_or(group_id),
            Self::Room { room_id, user_id } => user_id.as_deref().unwrap_or(room_id),
        }
    }
}

/// Incoming message payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LineMessage {
    Text {
        #[serde(default)]
        id: String,
        text: String,
    },
    Sticker {
        #[serde(default)]
        id: String,
        #[serde(rename = "packageId")]
        package_id: String,
        #[serde(rename = "stickerId")]
        sticker_id: String,
    },
    /// Image, video, audio, location, file...
    #[serde(other)]
    Other,
}

/// LINE webhook event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LineEvent {
    Message {
        #[serde(rename = "replyToken")]
        reply_token: String,
        source: LineSource,
        message: LineMessage,
    },
    Follow {
        #[serde(rename = "replyToken")]
        reply_token: String,
        source: LineSource,
    },
    Unfollow {
        source: LineSource,
    },
    Join {
        #[serde(rename = "replyToken")]
        reply_token: String,
        source: LineSource,
    },
    Leave {
        source: LineSource,
    },
}

impl LineEvent {
    /// Decode one entry of the webhook `events` array
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let event_type = value
            .get("type")
            .and_then(|t| t.as_str())
            .unwrap_or_default();

        if !KNOWN_EVENT_TYPES.contains(&event_type) {
            return Err(LineError::UnknownEvent(value.to_string()));
        }

        serde_json::from_value(value).map_err(|e| LineError::ParseError(e.to_string()))
    }
}

/// Reply message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyMessage {
    #[serde(rename = "replyToken")]
    pub reply_token: String,
    pub messages: Vec<MessageContent>,
}

/// Outgoing message content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    Text {
        text: String,
    },
    Image {
        #[serde(rename = "originalContentUrl")]
        original_content_url: String,
        #[serde(rename = "previewImageUrl")]
        preview_image_url: String,
    },
    Imagemap {
        #[serde(rename = "baseUrl")]
        base_url: String,
        #[serde(rename = "altText")]
        alt_text: String,
        #[serde(rename = "baseSize")]
        base_size: ImagemapSize,
        actions: Vec<ImagemapAction>,
    },
    Sticker {
        #[serde(rename = "packageId")]
        package_id: String,
        #[serde(rename = "stickerId")]
        sticker_id: String,
    },
}

impl MessageContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Image message using the same URL for the full image and the preview
    pub fn image(url: impl Into<String>) -> Self {
        let url = url.into();
        Self::Image {
            original_content_url: url.clone(),
            preview_image_url: url,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImagemapSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImagemapArea {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Tappable imagemap region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ImagemapAction {
    /// Sends `text` as if the user typed it
    Message { area: ImagemapArea, text: String },
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineApiResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<Vec<ErrorDetail>>,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    pub property: Option<String>,
}
