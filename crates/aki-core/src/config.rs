//! Configuration management
//!
//! 設定は以下の優先順位で読み込まれます:
//! 1. 環境変数
//! 2. aki-gateway.toml 設定ファイル
//! 3. デフォルト値
//!
//! 設定ファイル内では `${VAR_NAME}` 形式で環境変数を展開できます。

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Error;

/// Default configuration file name
pub const CONFIG_FILE: &str = "aki-gateway.toml";

/// Main configuration for aki-gateway
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// LINE channel credentials
    #[serde(default)]
    pub line: LineConfig,

    /// Webhook server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Game configuration
    #[serde(default)]
    pub game: GameConfig,
}

/// LINE channel credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineConfig {
    /// Channel secret (webhook signature key)
    #[serde(skip_serializing)]
    pub channel_secret: String,

    /// Channel access token (Messaging API bearer token)
    #[serde(skip_serializing)]
    pub channel_access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port for the webhook server
    #[serde(default = "default_port")]
    pub port: u16,

    /// Public base URL, used to build absolute image URLs
    #[serde(default)]
    pub base_url: String,

    /// Directory served under `/images`
    #[serde(default = "default_images_dir")]
    pub images_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            base_url: String::new(),
            images_dir: default_images_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Akinator language region (en, jp, fr, ...)
    #[serde(default = "default_language")]
    pub language: String,

    /// Child mode filter on the game service
    #[serde(default)]
    pub child_mode: bool,

    /// Progress score at which the bot makes its guess
    #[serde(default = "default_win_progress")]
    pub win_progress: f64,

    /// Question count at which the bot guesses regardless of progress
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            child_mode: false,
            win_progress: default_win_progress(),
            max_steps: default_max_steps(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_images_dir() -> String {
    "images".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_win_progress() -> f64 {
    80.0
}

fn default_max_steps() -> usize {
    50
}

impl Config {
    /// 設定ファイルから環境変数を展開する
    ///
    /// `${VAR_NAME}` 形式の文字列を環境変数の値に置換します。
    /// 環境変数が存在しない場合は空文字列になります。
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next(); // '{' を消費

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// TOML 設定ファイルから設定を読み込む
    ///
    /// 設定ファイル内の `${VAR_NAME}` は環境変数の値に置換され、
    /// その後、環境変数による上書きが適用されます。
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();

        let toml_content = std::fs::read_to_string(path)?;

        let mut cfg = Self::from_toml_str(&toml_content)?;
        cfg.apply_env_overrides();

        Ok(cfg)
    }

    /// Parse a TOML document (after `${VAR}` expansion) without env overrides
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let expanded_content = Self::expand_env_vars(content);

        toml::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// デフォルトパスから設定を読み込む
    ///
    /// `./aki-gateway.toml` があればそれを使い、なければ環境変数のみ。
    pub fn load() -> crate::Result<Self> {
        if Path::new(CONFIG_FILE).exists() {
            return Self::from_toml_file(CONFIG_FILE);
        }

        Self::from_env()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut cfg = Self::default();
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// 環境変数で設定を上書きする
    fn apply_env_overrides(&mut self) {
        // LINE 設定の上書き
        if let Ok(secret) = std::env::var("CHANNEL_SECRET") {
            self.line.channel_secret = secret;
        }
        if let Ok(token) = std::env::var("CHANNEL_ACCESS_TOKEN") {
            self.line.channel_access_token = token;
        }

        // サーバー設定の上書き
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(base_url) = std::env::var("BASE_URL") {
            if !base_url.is_empty() {
                self.server.base_url = base_url;
            }
        }
        if let Ok(dir) = std::env::var("IMAGES_DIR") {
            if !dir.is_empty() {
                self.server.images_dir = dir;
            }
        }

        // ゲーム設定の上書き
        if let Ok(language) = std::env::var("AKI_LANGUAGE") {
            if !language.is_empty() {
                self.game.language = language;
            }
        }
        if let Ok(child_mode) = std::env::var("AKI_CHILD_MODE") {
            self.game.child_mode = child_mode.to_lowercase() == "true";
        }
        if let Ok(progress) = std::env::var("AKI_WIN_PROGRESS") {
            if let Ok(p) = progress.parse() {
                self.game.win_progress = p;
            }
        }
        if let Ok(steps) = std::env::var("AKI_MAX_STEPS") {
            if let Ok(s) = steps.parse() {
                self.game.max_steps = s;
            }
        }
    }

    /// Check that everything the webhook server needs is present
    pub fn validate(&self) -> crate::Result<()> {
        if self.line.channel_secret.is_empty() {
            return Err(Error::Config("CHANNEL_SECRET not set".to_string()));
        }
        if self.line.channel_access_token.is_empty() {
            return Err(Error::Config("CHANNEL_ACCESS_TOKEN not set".to_string()));
        }
        if self.server.base_url.is_empty() {
            return Err(Error::Config("BASE_URL not set".to_string()));
        }
        Ok(())
    }
}
