//! Update receiver with long polling.

use crate::client::TelegramClient;
use crate::error::TelegramError;
use crate::types::*;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use tokio_stream::Stream;
use tracing::{debug, error};

/// Update receiver that long-polls `getUpdates`.
///
/// The offset moves past an update as soon as it is yielded, so it is
/// confirmed to Telegram by the next poll, or by `acknowledge` on shutdown.
pub struct UpdateReceiver {
    client: TelegramClient,
    error_backoff: Duration,
    offset: AtomicI64,
}

impl UpdateReceiver {
    /// Create a new update receiver.
    pub fn new(client: TelegramClient, error_backoff: Duration) -> Self {
        Self {
            client,
            error_backoff,
            offset: AtomicI64::new(0),
        }
    }

    /// Offset the next poll will send.
    pub fn offset(&self) -> i64 {
        self.offset.load(Ordering::Relaxed)
    }

    /// Start receiving messages as an async stream.
    pub fn stream(&self) -> impl Stream<Item = BotMessage> + '_ {
        async_stream::stream! {
            loop {
                match self.client.get_updates(self.offset()).await {
                    Ok(updates) => {
                        for update in updates {
                            self.offset.fetch_max(update.update_id + 1, Ordering::Relaxed);
                            if let Some(bot_msg) = BotMessage::from_update(&update) {
                                debug!("Received update {} from {}", update.update_id, bot_msg.chat_id);
                                yield bot_msg;
                            }
                        }
                    }
                    Err(e) => {
                        error!("Receive error: {}", e);
                        // Back off on error
                        sleep(self.error_backoff).await;
                    }
                }
            }
        }
    }

    /// Confirm everything yielded so far, so a restart does not replay it.
    pub async fn acknowledge(&self) -> Result<(), TelegramError> {
        let offset = self.offset();
        if offset == 0 {
            return Ok(());
        }
        self.client.confirm_updates(offset).await
    }
}
