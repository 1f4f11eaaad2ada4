//! LINE event handler implementation

use std::sync::Arc;

use tracing::{debug, info};

use crate::api::LineMessenger;
use crate::dispatcher::{Dispatcher, LeaveTarget};
use crate::error::Result;
use crate::reply;
use crate::types::{LineEvent, LineMessage, LineSource, MessageContent};

/// Handles webhook events: game commands, stickers, follows and joins
pub struct MessageHandler {
    messenger: Arc<dyn LineMessenger>,
    dispatcher: Dispatcher,
}

impl MessageHandler {
    /// Create a new message handler
    pub fn new(messenger: Arc<dyn LineMessenger>, dispatcher: Dispatcher) -> Self {
        Self {
            messenger,
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Handle one raw entry of the webhook `events` array
    pub async fn handle_value(&self, value: serde_json::Value) -> Result<()> {
        // Webhook verification from the LINE console sends dummy tokens
        if let Some(token) = value.get("replyToken").and_then(|t| t.as_str()) {
            if token.starts_with('#') {
                info!("Test hook received: {}", value.get("message").unwrap_or(&value));
                return Ok(());
            }
        }

        let event = LineEvent::from_value(value)?;
        self.process_event(&event).await
    }

    /// Process an incoming event
    pub async fn process_event(&self, event: &LineEvent) -> Result<()> {
        match event {
            LineEvent::Message {
                reply_token,
                source,
                message,
            } => match message {
                LineMessage::Text { text, .. } => self.handle_text(reply_token, source, text).await,
                LineMessage::Sticker {
                    package_id,
                    sticker_id,
                    ..
                } => {
                    let sticker = MessageContent::Sticker {
                        package_id: package_id.clone(),
                        sticker_id: sticker_id.clone(),
                    };
                    self.messenger.reply_message(reply_token, vec![sticker]).await
                }
                LineMessage::Other => Ok(()),
            },
            LineEvent::Follow { reply_token, .. } => {
                self.messenger
                    .reply_message(reply_token, vec![MessageContent::text(reply::FOLLOW)])
                    .await
            }
            LineEvent::Unfollow { source } => {
                info!("Unfollowed this bot: {:?}", source);
                Ok(())
            }
            LineEvent::Join { reply_token, .. } => {
                self.messenger
                    .reply_message(reply_token, vec![MessageContent::text(reply::JOIN)])
                    .await
            }
            LineEvent::Leave { source } => {
                info!("Left: {:?}", source);
                Ok(())
            }
        }
    }

    /// Run a text message through the dispatcher and deliver the reply
    async fn handle_text(&self, reply_token: &str, source: &LineSource, text: &str) -> Result<()> {
        let user_id = source.session_key();
        debug!("Text from {}: {}", user_id, text);

        let reply = self.dispatcher.dispatch(user_id, source, text).await;

        self.messenger.reply_message(reply_token, reply.messages).await?;

        match reply.leave {
            Some(LeaveTarget::Group(group_id)) => self.messenger.leave_group(&group_id).await,
            Some(LeaveTarget::Room(room_id)) => self.messenger.leave_room(&room_id).await,
            None => Ok(()),
        }
    }
}
