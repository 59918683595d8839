//! Telegram Bot API HTTP client.

use crate::error::TelegramError;
use crate::types::*;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Extra time granted to a request on top of the long-poll timeout.
const REQUEST_TIMEOUT_MARGIN: Duration = Duration::from_secs(10);

/// Telegram Bot API client.
///
/// The token is part of every request path, so it is held as a
/// `SecretString` and never formatted into logs.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
    token: SecretString,
    poll_timeout: Duration,
}

impl TelegramClient {
    /// Create a new Telegram client.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        poll_timeout: Duration,
    ) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(poll_timeout + REQUEST_TIMEOUT_MARGIN)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: SecretString::new(token.into()),
            poll_timeout,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.base_url,
            self.token.expose_secret(),
            method
        )
    }

    async fn call<Req, Res>(&self, method: &str, request: &Req) -> Result<Res, TelegramError>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .json(request)
            .send()
            .await
            .map_err(strip_url)?;

        // Bot API reports failures in the body, with a matching HTTP status
        let body: ApiResponse<Res> = response.json().await.map_err(strip_url)?;
        if !body.ok {
            return Err(TelegramError::Api {
                code: body.error_code.unwrap_or_default(),
                description: body.description.unwrap_or_default(),
            });
        }

        body.result.ok_or(TelegramError::EmptyResult)
    }

    /// Get the bot's own account.
    #[instrument(skip(self))]
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-poll for updates starting at `offset`.
    #[instrument(skip(self))]
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TelegramError> {
        let updates = self.fetch_updates(offset, self.poll_timeout.as_secs()).await?;
        debug!("Received {} updates", updates.len());
        Ok(updates)
    }

    /// Mark every update below `offset` as handled without waiting for new ones.
    ///
    /// Updates returned by this call stay unconfirmed and are delivered again
    /// on the next poll.
    #[instrument(skip(self))]
    pub async fn confirm_updates(&self, offset: i64) -> Result<(), TelegramError> {
        self.fetch_updates(offset, 0).await?;
        debug!("Confirmed updates below {}", offset);
        Ok(())
    }

    async fn fetch_updates(&self, offset: i64, timeout: u64) -> Result<Vec<Update>, TelegramError> {
        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message".into()],
        };

        self.call("getUpdates", &request).await
    }

    /// Send a text message to a chat.
    #[instrument(skip(self, text))]
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let request = SendMessageRequest {
            chat_id,
            text: text.to_string(),
        };

        self.call::<_, serde_json::Value>("sendMessage", &request)
            .await
            .map_err(send_failed)?;

        debug!("Sent message to {}", chat_id);
        Ok(())
    }

    /// Send an already uploaded photo to a chat.
    #[instrument(skip(self, file_id, caption))]
    pub async fn send_photo(
        &self,
        chat_id: i64,
        file_id: &str,
        caption: Option<&str>,
    ) -> Result<(), TelegramError> {
        let request = SendPhotoRequest {
            chat_id,
            photo: file_id.to_string(),
            caption: caption.map(String::from),
        };

        self.call::<_, serde_json::Value>("sendPhoto", &request)
            .await
            .map_err(send_failed)?;

        debug!("Sent photo to {}", chat_id);
        Ok(())
    }

    /// Deliver text or a photo to a chat.
    pub async fn send(&self, chat_id: i64, content: &OutgoingContent) -> Result<(), TelegramError> {
        match content {
            OutgoingContent::Text(text) => self.send_message(chat_id, text).await,
            OutgoingContent::Photo { file_id, caption } => {
                self.send_photo(chat_id, file_id, caption.as_deref()).await
            }
        }
    }
}

/// Request URLs embed the token; keep them out of error messages.
fn strip_url(e: reqwest::Error) -> TelegramError {
    TelegramError::Http(e.without_url())
}

fn send_failed(e: TelegramError) -> TelegramError {
    warn!("Send failed: {}", e);
    match e {
        TelegramError::Api { description, .. } => TelegramError::SendFailed(description),
        other => other,
    }
}
