//! Game client trait definition

use async_trait::async_trait;

use crate::error::GameResult;
use crate::game::types::{AnswerOption, Guess};

/// Stateful handle on one game played against the external service.
///
/// Operations only change the readable fields when they succeed; a failed
/// call leaves the handle exactly as it was.
#[async_trait]
pub trait GameClient: Send + Sync {
    /// Begin a new game, discarding any previous one
    async fn start(&mut self) -> GameResult<()>;

    /// Answer the current question
    async fn step(&mut self, answer: AnswerOption) -> GameResult<()>;

    /// Return to the previous question
    async fn back(&mut self) -> GameResult<()>;

    /// Ask the service for its final answer and end the game.
    ///
    /// Returns [`GameError::NoGuess`](crate::GameError::NoGuess) and leaves the
    /// game running when the service has no answer yet.
    async fn win(&mut self) -> GameResult<()>;

    /// Current question text
    fn question(&self) -> &str;

    /// Zero-based index of the current question
    fn current_step(&self) -> usize;

    /// Confidence score, 0 to 100
    fn progress(&self) -> f64;

    fn game_started(&self) -> bool;

    fn game_ended(&self) -> bool;

    /// Final answers, best first. Empty until `win` succeeds.
    fn answers(&self) -> &[Guess];
}

/// Creates fresh game handles for new sessions
pub trait GameClientFactory: Send + Sync {
    fn create(&self) -> Box<dyn GameClient>;
}

impl<F> GameClientFactory for F
where
    F: Fn() -> Box<dyn GameClient> + Send + Sync,
{
    fn create(&self) -> Box<dyn GameClient> {
        self()
    }
}
