//! Error types for aki-core

use thiserror::Error;

/// Main error type for aki-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by a game client
#[derive(Error, Debug)]
pub enum GameError {
    #[error("Game service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response from game service: {0}")]
    UnexpectedResponse(String),

    #[error("Game service rejected the request: {0}")]
    Rejected(String),

    #[error("Game has not been started")]
    NotStarted,

    #[error("Game has already ended")]
    Ended,

    #[error("Already at the first question")]
    CannotGoBack,

    #[error("Game service has not proposed a guess yet")]
    NoGuess,
}

/// Result type alias for aki-core
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for game operations
pub type GameResult<T> = std::result::Result<T, GameError>;
