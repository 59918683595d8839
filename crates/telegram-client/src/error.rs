//! Telegram client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {code} - {description}")]
    Api { code: i64, description: String },

    #[error("Empty result from Bot API")]
    EmptyResult,

    #[error("Send failed: {0}")]
    SendFailed(String),
}
