//! Game client interface
//!
//! The guessing logic lives in an external service. This module defines the
//! narrow surface the gateways drive, and the akinator.com provider.

pub mod akinator;
pub mod traits;
pub mod types;

pub use akinator::{AkinatorClient, AkinatorFactory};
pub use traits::{GameClient, GameClientFactory};
pub use types::{AnswerOption, Guess};
