//! Webhook server for LINE Bot
//!
//! Handles incoming webhooks from LINE Messaging API and serves the
//! option-menu and icon images.

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::get,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use futures::future::try_join_all;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{debug, error, info, warn};

use crate::error::{LineError, Result};
use crate::handler::MessageHandler;

type HmacSha256 = Hmac<Sha256>;

/// Webhook server state
#[derive(Clone)]
pub struct WebhookState {
    pub channel_secret: String,
    pub handler: Arc<MessageHandler>,
}

/// Create webhook router
pub fn create_webhook_router(state: WebhookState, images_dir: &str) -> Router {
    Router::new()
        .route("/callback", get(handle_health).post(handle_webhook))
        .nest_service("/images", ServeDir::new(images_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

async fn handle_health() -> &'static str {
    "I'm listening. Please access with POST."
}

/// Handle incoming webhook
async fn handle_webhook(
    State(state): State<Arc<WebhookState>>,
    headers: HeaderMap,
    body: Bytes,
) -> std::result::Result<StatusCode, StatusCode> {
    // Verify signature
    let signature = headers
        .get("x-line-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing x-line-signature header");
            StatusCode::BAD_REQUEST
        })?;

    verify_signature(&state.channel_secret, &body, signature).map_err(|_| {
        warn!("Invalid signature");
        StatusCode::UNAUTHORIZED
    })?;

    let payload: serde_json::Value = serde_json::from_slice(&body).map_err(|e| {
        error!("Failed to parse webhook body: {:?}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    if let Some(destination) = payload.get("destination").and_then(|d| d.as_str()) {
        info!("Destination User ID: {}", destination);
    }

    let events = payload
        .get("events")
        .and_then(|e| e.as_array())
        .ok_or_else(|| {
            error!("Webhook body has no events array");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    debug!("Received {} event(s)", events.len());

    // Events in one delivery run concurrently; any failure fails the delivery
    try_join_all(
        events
            .iter()
            .cloned()
            .map(|event| state.handler.handle_value(event)),
    )
    .await
    .map_err(|e| {
        error!("Error processing event: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(StatusCode::OK)
}

/// Verify LINE signature (base64 HMAC-SHA256 of the raw body)
fn verify_signature(channel_secret: &str, body: &[u8], signature: &str) -> Result<()> {
    let expected = STANDARD
        .decode(signature)
        .map_err(|_| LineError::InvalidSignature)?;

    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .map_err(|_| LineError::InvalidSignature)?;
    mac.update(body);

    mac.verify_slice(&expected)
        .map_err(|_| LineError::InvalidSignature)
}
