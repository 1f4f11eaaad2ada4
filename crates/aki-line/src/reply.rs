//! Reply message construction

use aki_core::{AnswerOption, GameClient};

use crate::types::{ImagemapAction, ImagemapArea, ImagemapSize, MessageContent};

pub const INTRO: &str = "Think about a real or fictional character.\nI will try to guess who it is.";
pub const NO_QUESTION: &str = "Akinator has no question to you.";
pub const BACK_HINT: &str = "Or type `back` to back to previous question.";
pub const NO_GUESS: &str = "Akinator went wrong...";
pub const START_AGAIN: &str = "Type `start` again to start a new game.";
pub const START_FIRST: &str = "Please start the game first.";
pub const TYPE_START: &str = "Type `start` to start the game.";
pub const ASKING: &str = "Akinator is asking!";
pub const FIRST_QUESTION: &str = "This is the first question already.";
pub const BYE_USER: &str = "Akinator is inevitable.";
pub const BYE_GROUP: &str = "However... Akinator is not omnipotent.";
pub const FOLLOW: &str = "Challenge me. I will read your mind.";
pub const JOIN: &str = "Akinator is omniscient.";
pub const FAILURE: &str = "Something went wrong. Please try again.";

/// Option menu image is 1040x1040 with one 208px row per option
const MENU_SIZE: u32 = 1040;
const MENU_ROW_HEIGHT: u32 = 208;

/// Builds the message bundles sent back to the chat
#[derive(Debug, Clone)]
pub struct ReplyBuilder {
    base_url: String,
}

impl ReplyBuilder {
    /// `base_url` is the public URL the `/images` directory is served under
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn image_url(&self, name: &str) -> String {
        format!("{}/images/{}", self.base_url, name)
    }

    /// Intro followed by the first question
    pub fn intro(&self, game: &dyn GameClient) -> Vec<MessageContent> {
        let mut messages = vec![MessageContent::text(INTRO)];
        messages.extend(self.question(game, false));
        messages
    }

    /// Current question, the option menu and the back hint
    pub fn question(&self, game: &dyn GameClient, after_back: bool) -> Vec<MessageContent> {
        let prefix = if after_back { "(Back) " } else { "" };
        let question = game.question().trim();
        let body = if question.is_empty() {
            NO_QUESTION.to_string()
        } else {
            format!("*{}*", question)
        };

        vec![
            MessageContent::text(format!(
                "{}Question {}:\n{}",
                prefix,
                game.current_step() + 1,
                body
            )),
            self.option_menu(),
            MessageContent::text(BACK_HINT),
        ]
    }

    /// The final answer: text, picture, restart hint
    pub fn guess(&self, game: &dyn GameClient) -> Vec<MessageContent> {
        let icon = self.image_url("icon.jpg");

        let Some(answer) = game.answers().first() else {
            return vec![
                MessageContent::text(NO_GUESS),
                MessageContent::image(icon),
                MessageContent::text(START_AGAIN),
            ];
        };

        let description = answer.description.trim();
        let text = if description.is_empty() {
            format!("I think of *{}*.", answer.name)
        } else {
            format!("I think of *{}* ({}).", answer.name, description)
        };
        let picture = answer
            .picture_url
            .clone()
            .filter(|url| !url.is_empty())
            .unwrap_or(icon);

        vec![
            MessageContent::text(text),
            MessageContent::image(picture),
            MessageContent::text(START_AGAIN),
        ]
    }

    /// Imagemap with one tappable row per answer option
    pub fn option_menu(&self) -> MessageContent {
        let actions = AnswerOption::ALL
            .iter()
            .zip(0u32..)
            .map(|(option, row)| ImagemapAction::Message {
                area: ImagemapArea {
                    x: 0,
                    y: MENU_ROW_HEIGHT * row,
                    width: MENU_SIZE,
                    height: MENU_ROW_HEIGHT,
                },
                text: option.label().to_string(),
            })
            .collect();

        MessageContent::Imagemap {
            base_url: self.image_url("options"),
            alt_text: "Akinator options".to_string(),
            base_size: ImagemapSize {
                width: MENU_SIZE,
                height: MENU_SIZE,
            },
            actions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedGame;
    use aki_core::Guess;

    fn builder() -> ReplyBuilder {
        ReplyBuilder::new("https://aki.example.com/")
    }

    fn text_of(message: &MessageContent) -> &str {
        match message {
            MessageContent::Text { text } => text,
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_question_bundle() {
        let mut game = ScriptedGame::default();
        game.started = true;
        game.question = "Is your character real?".to_string();

        let messages = builder().question(&game, false);
        assert_eq!(messages.len(), 3);
        assert_eq!(text_of(&messages[0]), "Question 1:\n*Is your character real?*");
        assert!(matches!(messages[1], MessageContent::Imagemap { .. }));
        assert_eq!(text_of(&messages[2]), BACK_HINT);
    }

    #[test]
    fn test_question_after_back() {
        let mut game = ScriptedGame::default();
        game.step = 2;
        game.question = "Is your character a girl?".to_string();

        let messages = builder().question(&game, true);
        assert_eq!(text_of(&messages[0]), "(Back) Question 3:\n*Is your character a girl?*");
    }

    #[test]
    fn test_empty_question_falls_back() {
        let mut game = ScriptedGame::default();
        game.question = "   ".to_string();

        let messages = builder().question(&game, false);
        assert_eq!(text_of(&messages[0]), format!("Question 1:\n{}", NO_QUESTION));
    }

    #[test]
    fn test_option_menu_layout() {
        let MessageContent::Imagemap {
            base_url,
            base_size,
            actions,
            ..
        } = builder().option_menu()
        else {
            panic!("expected imagemap");
        };

        assert_eq!(base_url, "https://aki.example.com/images/options");
        assert_eq!(base_size, ImagemapSize { width: 1040, height: 1040 });
        assert_eq!(actions.len(), 5);

        let ImagemapAction::Message { area, text } = &actions[4];
        assert_eq!(text, "Probably not");
        assert_eq!(area.y, 832);
        assert_eq!(area.height, 208);
    }

    #[test]
    fn test_guess_with_picture() {
        let mut game = ScriptedGame::default();
        game.answers = vec![Guess {
            name: "Mario".to_string(),
            description: "Video game character".to_string(),
            picture_url: Some("https://photos.example.com/mario.jpg".to_string()),
        }];

        let messages = builder().guess(&game);
        assert_eq!(text_of(&messages[0]), "I think of *Mario* (Video game character).");
        assert_eq!(messages[1], MessageContent::image("https://photos.example.com/mario.jpg"));
        assert_eq!(text_of(&messages[2]), START_AGAIN);
    }

    #[test]
    fn test_guess_without_picture_uses_icon() {
        let mut game = ScriptedGame::default();
        game.answers = vec![Guess {
            name: "Mario".to_string(),
            description: String::new(),
            picture_url: None,
        }];

        let messages = builder().guess(&game);
        assert_eq!(text_of(&messages[0]), "I think of *Mario*.");
        assert_eq!(messages[1], MessageContent::image("https://aki.example.com/images/icon.jpg"));
    }

    #[test]
    fn test_guess_without_answers() {
        let game = ScriptedGame::default();
        let messages = builder().guess(&game);
        assert_eq!(text_of(&messages[0]), NO_GUESS);
    }
}
