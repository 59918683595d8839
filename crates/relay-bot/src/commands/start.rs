//! Start command - claims a slot with an invitation code.

use crate::commands::CommandHandler;
use crate::config::BotMessages;
use crate::messenger::{deliver, Messenger};
use async_trait::async_trait;
use pairing_store::{PairingStore, Registration};
use std::sync::Arc;
use telegram_client::{BotMessage, OutgoingContent};
use tracing::{debug, info, warn};

pub struct StartHandler {
    store: Arc<PairingStore>,
    messenger: Arc<dyn Messenger>,
    messages: BotMessages,
}

impl StartHandler {
    pub fn new(
        store: Arc<PairingStore>,
        messenger: Arc<dyn Messenger>,
        messages: BotMessages,
    ) -> Self {
        Self {
            store,
            messenger,
            messages,
        }
    }
}

#[async_trait]
impl CommandHandler for StartHandler {
    fn name(&self) -> &str {
        "start"
    }

    fn trigger(&self) -> Option<&str> {
        Some("start")
    }

    async fn execute(&self, message: &BotMessage) {
        let code = message.command().map(|(_, arg)| arg).unwrap_or_default();
        let caller = message.chat_id;

        match self.store.register(caller, code).await {
            Registration::Ignored => {
                debug!("Start without invitation code from {}", caller);
            }
            Registration::Rejected => {
                deliver(
                    self.messenger.as_ref(),
                    caller,
                    OutgoingContent::text(&self.messages.wrong_code),
                )
                .await;
            }
            Registration::Bound {
                slot,
                counterpart,
                persisted,
            } => {
                if !persisted {
                    warn!("Slot {} bound to {} in memory only", slot, caller);
                }

                deliver(
                    self.messenger.as_ref(),
                    caller,
                    OutgoingContent::text(&self.messages.welcome),
                )
                .await;

                if let Some(companion) = counterpart {
                    info!("Notifying {} that {} joined", companion, caller);
                    deliver(
                        self.messenger.as_ref(),
                        companion,
                        OutgoingContent::text(&self.messages.companion_joined),
                    )
                    .await;
                }
            }
        }
    }
}
