//! Pairing store errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PairingError {
    /// The state file exists but does not hold a valid pairing record.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for PairingError {
    fn from(e: std::io::Error) -> Self {
        PairingError::Storage(e.to_string())
    }
}
