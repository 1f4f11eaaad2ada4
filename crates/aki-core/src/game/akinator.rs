//! akinator.com web client
//!
//! Drives a game through the same form endpoints the akinator.com web page
//! uses: `/game` to open a session, `/answer` to step and `/cancel_answer`
//! to go back.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use tracing::{debug, error, info};

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::game::traits::{GameClient, GameClientFactory};
use crate::game::types::{AnswerOption, Guess};

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

static SESSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"#session'\)\.val\('([^']+)'\)|name="session"[^>]*value="([^"]+)""#)
        .expect("valid session regex")
});

static SIGNATURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"#signature'\)\.val\('([^']+)'\)|name="signature"[^>]*value="([^"]+)""#)
        .expect("valid signature regex")
});

static QUESTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<p[^>]*id="question-label"[^>]*>([^<]*)</p>"#).expect("valid question regex")
});

/// Per-game state, replaced only after a successful response
#[derive(Debug, Clone, Default)]
struct GameState {
    session: String,
    signature: String,
    question: String,
    step: usize,
    progress: f64,
    step_last_proposition: String,
    started: bool,
    ended: bool,
    proposal: Option<Guess>,
    answers: Vec<Guess>,
}

/// Game client backed by akinator.com
pub struct AkinatorClient {
    client: Client,
    base_url: String,
    child_mode: bool,
    state: GameState,
}

impl AkinatorClient {
    /// Create a client for the given language region
    pub fn new(language: &str, child_mode: bool) -> GameResult<Self> {
        Ok(Self::with_client(build_http_client()?, language, child_mode))
    }

    /// Create a client sharing an existing HTTP client
    pub fn with_client(client: Client, language: &str, child_mode: bool) -> Self {
        Self {
            client,
            base_url: format!("https://{}.akinator.com", language),
            child_mode,
            state: GameState::default(),
        }
    }

    fn child_mode_param(&self) -> String {
        self.child_mode.to_string()
    }

    fn ensure_playing(&self) -> GameResult<()> {
        if !self.state.started {
            return Err(GameError::NotStarted);
        }
        if self.state.ended {
            return Err(GameError::Ended);
        }
        Ok(())
    }

    /// POST a form and return the response body
    async fn post_form(&self, path: &str, form: &[(&str, String)]) -> GameResult<String> {
        let url = format!("{}/{}", self.base_url, path);

        debug!("POST {}", url);

        let response = self.client.post(&url).form(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Akinator request failed: {} - {}", status, error_text);
            return Err(GameError::UnexpectedResponse(format!("{}: {}", status, error_text)));
        }

        Ok(response.text().await?)
    }

    fn apply_outcome(&mut self, outcome: AnswerOutcome) {
        match outcome {
            AnswerOutcome::Question {
                question,
                step,
                progress,
            } => {
                self.state.question = question;
                self.state.step = step.unwrap_or(self.state.step + 1);
                if let Some(progress) = progress {
                    self.state.progress = progress;
                }
                self.state.proposal = None;
            }
            AnswerOutcome::Proposal(guess) => {
                self.state.step_last_proposition = self.state.step.to_string();
                self.state.step += 1;
                self.state.progress = 100.0;
                self.state.proposal = Some(guess);
            }
        }
    }
}

#[async_trait]
impl GameClient for AkinatorClient {
    async fn start(&mut self) -> GameResult<()> {
        let form = [("sid", "1".to_string()), ("cm", self.child_mode_param())];
        let html = self.post_form("game", &form).await?;
        let page = parse_start_page(&html)?;

        info!("Started Akinator session");

        self.state = GameState {
            session: page.session,
            signature: page.signature,
            question: page.question,
            started: true,
            ..GameState::default()
        };
        Ok(())
    }

    async fn step(&mut self, answer: AnswerOption) -> GameResult<()> {
        self.ensure_playing()?;

        let form = [
            ("step", self.state.step.to_string()),
            ("progression", self.state.progress.to_string()),
            ("sid", "1".to_string()),
            ("cm", self.child_mode_param()),
            ("answer", answer.index().to_string()),
            ("step_last_proposition", self.state.step_last_proposition.clone()),
            ("session", self.state.session.clone()),
            ("signature", self.state.signature.clone()),
        ];
        let body = self.post_form("answer", &form).await?;
        let outcome = parse_answer(&body)?;

        self.apply_outcome(outcome);
        Ok(())
    }

    async fn back(&mut self) -> GameResult<()> {
        self.ensure_playing()?;
        if self.state.step == 0 {
            return Err(GameError::CannotGoBack);
        }

        let form = [
            ("step", self.state.step.to_string()),
            ("progression", self.state.progress.to_string()),
            ("sid", "1".to_string()),
            ("cm", self.child_mode_param()),
            ("session", self.state.session.clone()),
            ("signature", self.state.signature.clone()),
        ];
        let body = self.post_form("cancel_answer", &form).await?;

        match parse_answer(&body)? {
            AnswerOutcome::Question {
                question,
                step,
                progress,
            } => {
                let step = step.unwrap_or(self.state.step - 1);
                self.apply_outcome(AnswerOutcome::Question {
                    question,
                    step: Some(step),
                    progress,
                });
                Ok(())
            }
            AnswerOutcome::Proposal(_) => Err(GameError::UnexpectedResponse(
                "proposal returned while going back".to_string(),
            )),
        }
    }

    async fn win(&mut self) -> GameResult<()> {
        if !self.state.started {
            return Err(GameError::NotStarted);
        }
        let guess = self.state.proposal.take().ok_or(GameError::NoGuess)?;

        info!("Akinator guessed: {}", guess.name);

        self.state.answers = vec![guess];
        self.state.ended = true;
        Ok(())
    }

    fn question(&self) -> &str {
        &self.state.question
    }

    fn current_step(&self) -> usize {
        self.state.step
    }

    fn progress(&self) -> f64 {
        self.state.progress
    }

    fn game_started(&self) -> bool {
        self.state.started
    }

    fn game_ended(&self) -> bool {
        self.state.ended
    }

    fn answers(&self) -> &[Guess] {
        &self.state.answers
    }
}

/// Creates [`AkinatorClient`]s sharing one HTTP connection pool
#[derive(Clone)]
pub struct AkinatorFactory {
    client: Client,
    language: String,
    child_mode: bool,
}

impl AkinatorFactory {
    pub fn new(config: &GameConfig) -> GameResult<Self> {
        Ok(Self {
            client: build_http_client()?,
            language: config.language.clone(),
            child_mode: config.child_mode,
        })
    }
}

impl GameClientFactory for AkinatorFactory {
    fn create(&self) -> Box<dyn GameClient> {
        Box::new(AkinatorClient::with_client(
            self.client.clone(),
            &self.language,
            self.child_mode,
        ))
    }
}

fn build_http_client() -> GameResult<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT)
        .build()?)
}

// ============================================================================
// Response parsing
// ============================================================================

#[derive(Debug, PartialEq)]
struct StartPage {
    session: String,
    signature: String,
    question: String,
}

fn capture(re: &Regex, html: &str) -> Option<String> {
    let caps = re.captures(html)?;
    caps.iter()
        .skip(1)
        .flatten()
        .next()
        .map(|m| m.as_str().to_string())
}

fn parse_start_page(html: &str) -> GameResult<StartPage> {
    let session = capture(&SESSION_RE, html)
        .ok_or_else(|| GameError::UnexpectedResponse("session id not found".to_string()))?;
    let signature = capture(&SIGNATURE_RE, html)
        .ok_or_else(|| GameError::UnexpectedResponse("signature not found".to_string()))?;
    let question = capture(&QUESTION_RE, html)
        .map(|q| decode_entities(q.trim()))
        .unwrap_or_default();

    Ok(StartPage {
        session,
        signature,
        question,
    })
}

fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// `/answer` and `/cancel_answer` response body
#[derive(Debug, Deserialize)]
struct AnswerResponse {
    #[serde(default)]
    completion: Option<String>,
    #[serde(default)]
    question: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    step: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    progression: Option<f64>,
    #[serde(default)]
    name_proposition: Option<String>,
    #[serde(default)]
    description_proposition: Option<String>,
    #[serde(default)]
    photo: Option<String>,
}

#[derive(Debug, PartialEq)]
enum AnswerOutcome {
    Question {
        question: String,
        step: Option<usize>,
        progress: Option<f64>,
    },
    Proposal(Guess),
}

/// The service sends numbers both as JSON numbers and as strings
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn parse_answer(body: &str) -> GameResult<AnswerOutcome> {
    let response: AnswerResponse = serde_json::from_str(body)
        .map_err(|e| GameError::UnexpectedResponse(format!("invalid JSON: {}", e)))?;

    if let Some(completion) = &response.completion {
        if completion != "OK" {
            return Err(GameError::Rejected(completion.clone()));
        }
    }

    if let Some(name) = response.name_proposition.filter(|n| !n.is_empty()) {
        return Ok(AnswerOutcome::Proposal(Guess {
            name,
            description: response.description_proposition.unwrap_or_default(),
            picture_url: response.photo.filter(|p| !p.is_empty()),
        }));
    }

    match response.question {
        Some(question) => Ok(AnswerOutcome::Question {
            question: decode_entities(&question),
            step: response.step.map(|s| s as usize),
            progress: response.progression,
        }),
        None => Err(GameError::UnexpectedResponse(
            "neither a question nor a proposition".to_string(),
        )),
    }
}
