//! Test doubles for the game service and the LINE API

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use aki_core::{AnswerOption, GameClient, GameClientFactory, GameError, GameResult, Guess};
use async_trait::async_trait;

use crate::api::LineMessenger;
use crate::error::Result;
use crate::types::MessageContent;

/// Deterministic game: each answer adds `progress_per_step` to the score
#[derive(Debug, Default)]
pub struct ScriptedGame {
    pub started: bool,
    pub ended: bool,
    pub step: usize,
    pub question: String,
    pub progress: f64,
    pub answers: Vec<Guess>,
    pub progress_per_step: f64,
    pub picture_url: Option<String>,
    pub fail: Arc<AtomicBool>,
    /// `win` reports that no guess is available
    pub no_guess: Arc<AtomicBool>,
    /// Only `win` fails; the other operations keep working
    pub win_fails: Arc<AtomicBool>,
    pub answered: Vec<AnswerOption>,
}

impl ScriptedGame {
    fn check_failure(&self) -> GameResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(GameError::Rejected("KO - SERVER DOWN".to_string()));
        }
        Ok(())
    }

    fn ask(&mut self) {
        self.question = format!("Scripted question #{}?", self.step + 1);
    }
}

#[async_trait]
impl GameClient for ScriptedGame {
    async fn start(&mut self) -> GameResult<()> {
        self.check_failure()?;
        self.started = true;
        self.ended = false;
        self.step = 0;
        self.progress = 0.0;
        self.answers.clear();
        self.answered.clear();
        self.ask();
        Ok(())
    }

    async fn step(&mut self, answer: AnswerOption) -> GameResult<()> {
        self.check_failure()?;
        if !self.started {
            return Err(GameError::NotStarted);
        }
        self.step += 1;
        self.progress = (self.progress + self.progress_per_step).min(100.0);
        self.answered.push(answer);
        self.ask();
        Ok(())
    }

    async fn back(&mut self) -> GameResult<()> {
        self.check_failure()?;
        if self.step == 0 {
            return Err(GameError::CannotGoBack);
        }
        self.step -= 1;
        self.progress = (self.progress - self.progress_per_step).max(0.0);
        self.answered.pop();
        self.ask();
        Ok(())
    }

    async fn win(&mut self) -> GameResult<()> {
        self.check_failure()?;
        if self.win_fails.load(Ordering::SeqCst) {
            return Err(GameError::UnexpectedResponse("502 Bad Gateway".to_string()));
        }
        if self.no_guess.load(Ordering::SeqCst) {
            return Err(GameError::NoGuess);
        }
        self.answers = vec![Guess {
            name: "Mario".to_string(),
            description: "Video game character".to_string(),
            picture_url: self.picture_url.clone(),
        }];
        self.ended = true;
        Ok(())
    }

    fn question(&self) -> &str {
        &self.question
    }

    fn current_step(&self) -> usize {
        self.step
    }

    fn progress(&self) -> f64 {
        self.progress
    }

    fn game_started(&self) -> bool {
        self.started
    }

    fn game_ended(&self) -> bool {
        self.ended
    }

    fn answers(&self) -> &[Guess] {
        &self.answers
    }
}

/// Factory for [`ScriptedGame`]s that counts what it creates
#[derive(Clone, Default)]
pub struct ScriptedFactory {
    pub progress_per_step: f64,
    pub picture_url: Option<String>,
    pub fail: Arc<AtomicBool>,
    pub no_guess: Arc<AtomicBool>,
    pub win_fails: Arc<AtomicBool>,
    created: Arc<AtomicUsize>,
}

impl ScriptedFactory {
    pub fn with_progress(progress_per_step: f64) -> Self {
        Self {
            progress_per_step,
            ..Default::default()
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Make every following game operation fail
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Make `win` answer that there is no guess yet
    pub fn set_no_guess(&self, no_guess: bool) {
        self.no_guess.store(no_guess, Ordering::SeqCst);
    }

    /// Make only `win` fail
    pub fn set_win_failing(&self, fail: bool) {
        self.win_fails.store(fail, Ordering::SeqCst);
    }
}

impl GameClientFactory for ScriptedFactory {
    fn create(&self) -> Box<dyn GameClient> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Box::new(ScriptedGame {
            progress_per_step: self.progress_per_step,
            picture_url: self.picture_url.clone(),
            fail: Arc::clone(&self.fail),
            no_guess: Arc::clone(&self.no_guess),
            win_fails: Arc::clone(&self.win_fails),
            ..Default::default()
        })
    }
}

/// What the bot sent through the messenger
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Reply {
        token: String,
        messages: Vec<MessageContent>,
    },
    LeaveGroup(String),
    LeaveRoom(String),
}

/// Messenger that records instead of calling LINE
#[derive(Clone, Default)]
pub struct RecordingMessenger {
    sent: Arc<Mutex<Vec<Sent>>>,
}

impl RecordingMessenger {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    /// Text of every text message replied so far
    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Reply { messages, .. } => Some(messages),
                _ => None,
            })
            .flatten()
            .filter_map(|m| match m {
                MessageContent::Text { text } => Some(text),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl LineMessenger for RecordingMessenger {
    async fn reply_message(&self, reply_token: &str, messages: Vec<MessageContent>) -> Result<()> {
        self.sent.lock().unwrap().push(Sent::Reply {
            token: reply_token.to_string(),
            messages,
        });
        Ok(())
    }

    async fn leave_group(&self, group_id: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push(Sent::LeaveGroup(group_id.to_string()));
        Ok(())
    }

    async fn leave_room(&self, room_id: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push(Sent::LeaveRoom(room_id.to_string()));
        Ok(())
    }
}
