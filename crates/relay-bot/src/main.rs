//! Telegram relay bot - Main entry point.

use pairing_store::PairingStore;
use relay_bot::commands::*;
use relay_bot::config::{invitation_link, Config, STATE_PATH};
use relay_bot::error::AppResult;
use relay_bot::messenger::Messenger;
use secrecy::ExposeSecret;
use std::sync::Arc;
use telegram_client::{TelegramClient, UpdateReceiver};
use tokio::signal;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Stand-in for the bot username when neither config nor getMe provide one.
const PLACEHOLDER_USERNAME: &str = "your_bot_name";

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    init_logging(&config.bot.log_level);

    info!("Starting Telegram relay bot...");

    let store = Arc::new(PairingStore::load(STATE_PATH).await?);

    let telegram = TelegramClient::new(
        &config.telegram.api_url,
        config.bot_token.expose_secret(),
        config.telegram.poll_timeout,
    )?;

    // Health check doubles as username lookup for invitation links
    let username = match telegram.get_me().await {
        Ok(me) => {
            info!("Bot API healthy - logged in as {}", me.first_name);
            config.bot.username.clone().or(me.username)
        }
        Err(e) => {
            warn!("Bot API health check failed - will retry while polling: {}", e);
            config.bot.username.clone()
        }
    };
    let username = username.unwrap_or_else(|| PLACEHOLDER_USERNAME.into());

    for (slot, secret) in store.pending_invitations().await {
        info!(
            "Invitation for participant {}: {}",
            slot,
            invitation_link(&username, &secret)
        );
    }

    let messenger: Arc<dyn Messenger> = Arc::new(telegram.clone());

    // Create command handlers; the default relay handler goes last
    let handlers: Vec<Box<dyn CommandHandler>> = vec![
        Box::new(StartHandler::new(
            store.clone(),
            messenger.clone(),
            config.bot.messages.clone(),
        )),
        Box::new(RelayHandler::new(store.clone(), messenger.clone())),
    ];

    info!("Registered {} command handlers", handlers.len());
    info!("Listening for messages...");

    // Start update receiver
    let receiver = UpdateReceiver::new(telegram, config.telegram.error_backoff);

    {
        let mut stream = Box::pin(receiver.stream());

        // Main message loop
        loop {
            tokio::select! {
                Some(message) = stream.next() => {
                    let handler = handlers
                        .iter()
                        .find(|h| h.matches(&message));

                    if let Some(handler) = handler {
                        debug!("Dispatching message from {} to {}", message.chat_id, handler.name());
                        handler.execute(&message).await;
                    }
                }
                _ = signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }
    }

    // Confirm the last batch so a restart does not replay it
    if let Err(e) = receiver.acknowledge().await {
        warn!("Failed to confirm last updates: {}", e);
    }

    info!("Shutting down...");
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
