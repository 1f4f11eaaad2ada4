//! LINE Bot implementation
//!
//! Main entry point for the LINE Gateway

use std::path::Path;
use std::sync::Arc;

use aki_core::{Config, GameClientFactory};
use axum::Router;
use tracing::{info, warn};

use crate::api::{LineApiClient, LineMessenger};
use crate::dispatcher::{Dispatcher, WinRule};
use crate::error::{LineError, Result};
use crate::handler::MessageHandler;
use crate::reply::ReplyBuilder;
use crate::session::SessionRegistry;
use crate::webhook::{WebhookState, create_webhook_router};

/// Files the replies link to under `/images`
const REQUIRED_IMAGES: [&str; 6] = [
    "icon.jpg",
    "options/1040",
    "options/700",
    "options/460",
    "options/300",
    "options/240",
];

/// Images the replies need that `images_dir` does not have
fn missing_images(images_dir: &str) -> Vec<&'static str> {
    let dir = Path::new(images_dir);
    REQUIRED_IMAGES
        .into_iter()
        .filter(|name| !dir.join(name).is_file())
        .collect()
}

/// Akinator bot for LINE
pub struct LineBot {
    config: Config,
    registry: SessionRegistry,
    handler: Arc<MessageHandler>,
}

impl LineBot {
    /// Create a new LINE bot that talks to the real Messaging API
    pub fn new(config: Config, factory: Arc<dyn GameClientFactory>) -> Result<Self> {
        config.validate()?;

        let api_client = LineApiClient::new(&config.line.channel_access_token)?;
        Self::with_messenger(config, factory, Arc::new(api_client))
    }

    /// Create a bot with a custom outbound messenger
    pub fn with_messenger(
        config: Config,
        factory: Arc<dyn GameClientFactory>,
        messenger: Arc<dyn LineMessenger>,
    ) -> Result<Self> {
        if config.line.channel_secret.is_empty() {
            return Err(LineError::Config("Channel secret not configured".to_string()));
        }

        let registry = SessionRegistry::new(factory);
        let dispatcher = Dispatcher::new(
            registry.clone(),
            ReplyBuilder::new(&config.server.base_url),
            WinRule::from(&config.game),
        );
        let handler = Arc::new(MessageHandler::new(messenger, dispatcher));

        Ok(Self {
            config,
            registry,
            handler,
        })
    }

    /// Get the session registry
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Webhook routes plus static images
    pub fn router(&self) -> Router {
        let state = WebhookState {
            channel_secret: self.config.line.channel_secret.clone(),
            handler: self.handler.clone(),
        };
        create_webhook_router(state, &self.config.server.images_dir)
    }

    /// Run the bot until `shutdown` fires, then release all sessions
    pub async fn run(&self, mut shutdown: tokio::sync::broadcast::Receiver<()>) -> Result<()> {
        let missing = missing_images(&self.config.server.images_dir);
        if !missing.is_empty() {
            warn!(
                "Missing images in {}: {}",
                self.config.server.images_dir,
                missing.join(", ")
            );
        }

        let addr = format!("0.0.0.0:{}", self.config.server.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| LineError::Webhook(e.to_string()))?;

        info!(
            "Listening on {}:{}/callback",
            self.config.server.base_url, self.config.server.port
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                info!("LINE bot shutting down");
            })
            .await
            .map_err(|e| LineError::Webhook(e.to_string()))?;

        self.registry.shutdown();
        Ok(())
    }
}
