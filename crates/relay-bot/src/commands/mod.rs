//! Bot command handlers.

mod relay;
mod start;

pub use relay::RelayHandler;
pub use start::StartHandler;

use async_trait::async_trait;
use telegram_client::BotMessage;

/// Command handler trait.
///
/// Handlers are tried in order and the first match wins, so the default
/// handler goes last.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Handler name for logs.
    fn name(&self) -> &str;

    /// Command trigger without the slash (e.g., "start").
    fn trigger(&self) -> Option<&str> {
        None
    }

    /// Whether this is the default handler for non-command messages.
    fn is_default(&self) -> bool {
        false
    }

    /// Check if this handler matches the message.
    fn matches(&self, message: &BotMessage) -> bool {
        match (self.trigger(), message.command()) {
            (Some(trigger), Some((name, _))) => name == trigger,
            (Some(_), None) => false,
            (None, _) => self.is_default(),
        }
    }

    /// Execute the command. Replies are sent, and delivery failures logged,
    /// by the handler itself.
    async fn execute(&self, message: &BotMessage);
}
