//! Application configuration loaded from environment variables.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

/// Location of the persisted pairing record.
pub const STATE_PATH: &str = "./config/dialogue.json";

/// Application configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Bot API token (`BOT_TOKEN`)
    pub bot_token: SecretString,

    /// Telegram configuration
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Bot configuration
    #[serde(default)]
    pub bot: BotConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot API endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Long-poll timeout for getUpdates
    #[serde(default = "default_poll_timeout", with = "humantime_serde")]
    pub poll_timeout: Duration,

    /// Pause after a failed poll
    #[serde(default = "default_error_backoff", with = "humantime_serde")]
    pub error_backoff: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Bot username used in invitation links; resolved via getMe when unset
    #[serde(default)]
    pub username: Option<String>,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Texts sent to participants
    #[serde(default)]
    pub messages: BotMessages,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotMessages {
    #[serde(default = "default_welcome")]
    pub welcome: String,

    #[serde(default = "default_wrong_code")]
    pub wrong_code: String,

    #[serde(default = "default_companion_joined")]
    pub companion_joined: String,
}

// Default implementations
impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            poll_timeout: default_poll_timeout(),
            error_backoff: default_error_backoff(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            username: None,
            log_level: default_log_level(),
            messages: BotMessages::default(),
        }
    }
}

impl Default for BotMessages {
    fn default() -> Self {
        Self {
            welcome: default_welcome(),
            wrong_code: default_wrong_code(),
            companion_joined: default_companion_joined(),
        }
    }
}

// Default value functions
fn default_api_url() -> String {
    "https://api.telegram.org".into()
}

fn default_poll_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_error_backoff() -> Duration {
    Duration::from_secs(5)
}

fn default_log_level() -> String {
    "info".into()
}

fn default_welcome() -> String {
    "Welcome to the chat!".into()
}

fn default_wrong_code() -> String {
    "Invalid invitation code".into()
}

fn default_companion_joined() -> String {
    "Your companion has joined the chat".into()
}

/// Shareable deep link that starts the bot with `secret` as the argument.
pub fn invitation_link(bot_username: &str, secret: &str) -> String {
    format!("https://t.me/{}?start={}", bot_username, secret)
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_env(config::Environment::default())
    }

    fn from_env(env: config::Environment) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(
                // Tokens look numeric up to the colon; keep strings as strings.
                env.separator("__").try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
