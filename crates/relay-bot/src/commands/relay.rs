//! Relay handler - forwards everything else to the counterpart.

use crate::commands::CommandHandler;
use crate::messenger::{deliver, Messenger};
use async_trait::async_trait;
use pairing_store::PairingStore;
use std::sync::Arc;
use telegram_client::BotMessage;

pub struct RelayHandler {
    store: Arc<PairingStore>,
    messenger: Arc<dyn Messenger>,
}

impl RelayHandler {
    pub fn new(store: Arc<PairingStore>, messenger: Arc<dyn Messenger>) -> Self {
        Self { store, messenger }
    }
}

#[async_trait]
impl CommandHandler for RelayHandler {
    fn name(&self) -> &str {
        "relay"
    }

    fn is_default(&self) -> bool {
        true
    }

    async fn execute(&self, message: &BotMessage) {
        let Some(recipient) = self.store.counterpart(message.chat_id).await else {
            return;
        };

        deliver(
            self.messenger.as_ref(),
            recipient,
            message.content.clone().into(),
        )
        .await;
    }
}
