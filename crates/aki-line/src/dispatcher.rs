//! Command dispatcher
//!
//! Turns a parsed [`Command`] plus the sender's session state into game
//! operations and a [`Reply`]. The state table lives in [`route`].

use aki_core::{AnswerOption, GameConfig, GameError};
use tracing::{debug, error, info};

use crate::command::Command;
use crate::reply::{self, ReplyBuilder};
use crate::session::{SessionEntry, SessionRegistry};
use crate::types::{LineSource, MessageContent};

/// Where a user's game stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session, or a session whose game never started
    NoSession,
    /// At the first question
    Started,
    /// Past the first question
    AnsweringLoop,
    /// A final answer has been given
    Ended,
}

impl SessionState {
    pub fn of(entry: &SessionEntry) -> Self {
        let game = entry.game.as_ref();
        if !game.game_started() {
            Self::NoSession
        } else if game.game_ended() {
            Self::Ended
        } else if game.current_step() == 0 {
            Self::Started
        } else {
            Self::AnsweringLoop
        }
    }
}

/// What to do for a `(state, command)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Step(AnswerOption),
    Back,
    Bye,
    Say(&'static str),
}

/// The dispatcher's state table
pub fn route(state: SessionState, command: &Command) -> Action {
    use SessionState::*;

    match (state, command) {
        (_, Command::Start) => Action::Start,
        (_, Command::Bye) => Action::Bye,
        (NoSession, Command::Answer(_) | Command::Back) => Action::Say(reply::START_FIRST),
        (NoSession, Command::Other(_)) => Action::Say(reply::TYPE_START),
        (Started | AnsweringLoop, Command::Answer(option)) => Action::Step(*option),
        (Started, Command::Back) => Action::Say(reply::FIRST_QUESTION),
        (AnsweringLoop, Command::Back) => Action::Back,
        (Started | AnsweringLoop, Command::Other(_)) => Action::Say(reply::ASKING),
        (Ended, _) => Action::Say(reply::START_AGAIN),
    }
}

/// Chat the bot should leave after replying
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveTarget {
    Group(String),
    Room(String),
}

/// Messages to send back, plus an optional chat to leave
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub messages: Vec<MessageContent>,
    pub leave: Option<LeaveTarget>,
}

impl Reply {
    pub fn new(messages: Vec<MessageContent>) -> Self {
        Self {
            messages,
            leave: None,
        }
    }

    pub fn text(text: &str) -> Self {
        Self::new(vec![MessageContent::text(text)])
    }
}

/// Thresholds at which the bot stops asking and guesses
#[derive(Debug, Clone, Copy)]
pub struct WinRule {
    pub progress: f64,
    pub max_steps: usize,
}

impl WinRule {
    fn reached(&self, progress: f64, step: usize) -> bool {
        progress >= self.progress || step >= self.max_steps
    }
}

impl From<&GameConfig> for WinRule {
    fn from(config: &GameConfig) -> Self {
        Self {
            progress: config.win_progress,
            max_steps: config.max_steps,
        }
    }
}

impl Default for WinRule {
    fn default() -> Self {
        Self::from(&GameConfig::default())
    }
}

/// Session-scoped command dispatcher
pub struct Dispatcher {
    registry: SessionRegistry,
    replies: ReplyBuilder,
    win_rule: WinRule,
}

impl Dispatcher {
    pub fn new(registry: SessionRegistry, replies: ReplyBuilder, win_rule: WinRule) -> Self {
        Self {
            registry,
            replies,
            win_rule,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Handle one text message from `user_id`.
    ///
    /// The user's session stays locked until the reply is built, so
    /// concurrent messages from the same user are applied one at a time.
    pub async fn dispatch(&self, user_id: &str, source: &LineSource, text: &str) -> Reply {
        let command = Command::parse(text);

        let handle = match command {
            Command::Start => Some(self.registry.get_or_create(user_id)),
            _ => self.registry.get(user_id),
        };
        let mut guard = match handle.as_ref() {
            Some(handle) => Some(handle.lock().await),
            None => None,
        };

        let state = guard
            .as_deref()
            .map(SessionState::of)
            .unwrap_or(SessionState::NoSession);
        let action = route(state, &command);

        debug!(
            "Dispatching {:?} for {} in state {:?}: {:?}",
            command, user_id, state, action
        );

        match (action, guard.as_deref_mut()) {
            (Action::Say(text), _) => Reply::text(text),
            (Action::Bye, _) => self.bye(source),
            (Action::Start, Some(entry)) => self.start(entry).await,
            (Action::Step(option), Some(entry)) => self.step(entry, option).await,
            (Action::Back, Some(entry)) => self.back(entry).await,
            (_, None) => Reply::text(reply::TYPE_START),
        }
    }

    async fn start(&self, entry: &mut SessionEntry) -> Reply {
        entry.touch();
        match entry.game.start().await {
            Ok(()) => {
                info!("Game started");
                Reply::new(self.replies.intro(entry.game.as_ref()))
            }
            Err(e) => self.failure("start", e),
        }
    }

    async fn step(&self, entry: &mut SessionEntry, option: AnswerOption) -> Reply {
        entry.touch();
        if let Err(e) = entry.game.step(option).await {
            return self.failure("step", e);
        }

        let (progress, step) = (entry.game.progress(), entry.game.current_step());
        if self.win_rule.reached(progress, step) {
            match entry.game.win().await {
                Ok(()) => {
                    info!(
                        "Game ended after {} questions at {:.1}% ({}s)",
                        step,
                        progress,
                        entry.age().num_seconds()
                    );
                    return Reply::new(self.replies.guess(entry.game.as_ref()));
                }
                // The service has not settled on anyone yet: keep asking
                Err(GameError::NoGuess) => {
                    debug!("No guess at step {} ({:.1}%), continuing", step, progress);
                }
                Err(e) => return self.failure("win", e),
            }
        }

        Reply::new(self.replies.question(entry.game.as_ref(), false))
    }

    async fn back(&self, entry: &mut SessionEntry) -> Reply {
        entry.touch();
        match entry.game.back().await {
            Ok(()) => Reply::new(self.replies.question(entry.game.as_ref(), true)),
            Err(GameError::CannotGoBack) => Reply::text(reply::FIRST_QUESTION),
            Err(e) => self.failure("back", e),
        }
    }

    fn bye(&self, source: &LineSource) -> Reply {
        match source {
            LineSource::User { .. } => Reply::text(reply::BYE_USER),
            LineSource::Group { group_id, .. } => Reply {
                messages: vec![MessageContent::text(reply::BYE_GROUP)],
                leave: Some(LeaveTarget::Group(group_id.clone())),
            },
            LineSource::Room { room_id, .. } => Reply {
                messages: vec![MessageContent::text(reply::BYE_GROUP)],
                leave: Some(LeaveTarget::Room(room_id.clone())),
            },
        }
    }

    fn failure(&self, operation: &str, err: GameError) -> Reply {
        error!("Game {} failed: {}", operation, err);
        Reply::text(reply::FAILURE)
    }
}
