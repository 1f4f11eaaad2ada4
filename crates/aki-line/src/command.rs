//! Chat commands
//!
//! Message text is normalized once and parsed into a [`Command`].

use aki_core::AnswerOption;

/// A user command parsed from message text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start (or restart) a game
    Start,
    /// Answer the current question
    Answer(AnswerOption),
    /// Go back to the previous question
    Back,
    /// Say goodbye; leaves group chats
    Bye,
    /// Anything else
    Other(String),
}

impl Command {
    pub fn parse(text: &str) -> Self {
        let normalized = normalize(text);

        match normalized.as_str() {
            "start" => Self::Start,
            "back" => Self::Back,
            "bye" => Self::Bye,
            other => match AnswerOption::from_normalized(other) {
                Some(option) => Self::Answer(option),
                None => Self::Other(normalized),
            },
        }
    }
}

/// Trim, lowercase, and fold typographic apostrophes (mobile keyboards)
pub fn normalize(text: &str) -> String {
    text.trim().replace(['\u{2019}', '\u{2018}'], "'").to_lowercase()
}
