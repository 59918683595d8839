//! Application error types.

use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Telegram error: {0}")]
    Telegram(#[from] telegram_client::TelegramError),

    #[error("Pairing error: {0}")]
    Pairing(#[from] pairing_store::PairingError),
}

/// Result type alias for application errors.
pub type AppResult<T> = Result<T, AppError>;
