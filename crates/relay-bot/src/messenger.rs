//! Outbound delivery capability used by the handlers.

use async_trait::async_trait;
use telegram_client::{OutgoingContent, TelegramClient, TelegramError};
use tracing::warn;

/// Sends content to a chat.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, chat_id: i64, content: OutgoingContent) -> Result<(), TelegramError>;
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send(&self, chat_id: i64, content: OutgoingContent) -> Result<(), TelegramError> {
        TelegramClient::send(self, chat_id, &content).await
    }
}

/// Send and log a delivery failure instead of returning it.
pub async fn deliver(messenger: &dyn Messenger, chat_id: i64, content: OutgoingContent) {
    if let Err(e) = messenger.send(chat_id, content).await {
        warn!("Failed to deliver to {}: {}", chat_id, e);
    }
}
