//! Game data types

use serde::{Deserialize, Serialize};

/// One of the five fixed answers the game service accepts.
///
/// The discriminant is the ordinal the service expects for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerOption {
    Yes = 0,
    No = 1,
    DontKnow = 2,
    Probably = 3,
    ProbablyNot = 4,
}

impl AnswerOption {
    /// All options in ordinal order
    pub const ALL: [AnswerOption; 5] = [
        AnswerOption::Yes,
        AnswerOption::No,
        AnswerOption::DontKnow,
        AnswerOption::Probably,
        AnswerOption::ProbablyNot,
    ];

    /// Ordinal sent to the game service
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Label shown to (and typed back by) the user
    pub fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::DontKnow => "Don't know",
            Self::Probably => "Probably",
            Self::ProbablyNot => "Probably not",
        }
    }

    /// Match an already normalized (trimmed, lowercase) label
    pub fn from_normalized(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|option| option.label().to_lowercase() == text)
    }
}

/// A character the game service proposes as its answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guess {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub picture_url: Option<String>,
}
