//! エラー型定義 (aki-line)

use thiserror::Error;

/// aki-line のエラー型
#[derive(Error, Debug)]
pub enum LineError {
    #[error("LINE API error: {0}")]
    ApiError(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to parse event: {0}")]
    ParseError(String),

    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Webhook error: {0}")]
    Webhook(String),

    #[error("Core error: {0}")]
    Core(#[from] aki_core::Error),
}

/// Result 型エイリアス
pub type Result<T> = std::result::Result<T, LineError>;
