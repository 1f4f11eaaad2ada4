//! aki-core: Akinator Gateway Core Library
//!
//! Configuration, error types and the game-client interface shared by the
//! chat gateways, plus the HTTP provider that talks to akinator.com.

pub mod config;
pub mod error;
pub mod game;

pub use config::{Config, GameConfig, LineConfig, ServerConfig};
pub use error::{Error, GameError, GameResult, Result};
pub use game::{AkinatorClient, AkinatorFactory, AnswerOption, GameClient, GameClientFactory, Guess};
