//! Telegram Bot API types.

use serde::{Deserialize, Serialize};

/// Envelope around every Bot API response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

/// Incoming update from `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub date: i64,
    pub text: Option<String>,
    pub caption: Option<String>,
    pub photo: Option<Vec<PhotoSize>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub file_unique_id: String,
    pub width: u32,
    pub height: u32,
    pub file_size: Option<u64>,
}

/// `getUpdates` request.
#[derive(Debug, Clone, Serialize)]
pub struct GetUpdatesRequest {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: Vec<String>,
}

/// `sendMessage` request.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub chat_id: i64,
    pub text: String,
}

/// `sendPhoto` request referencing an already uploaded file.
#[derive(Debug, Clone, Serialize)]
pub struct SendPhotoRequest {
    pub chat_id: i64,
    pub photo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Content of an inbound message the bot cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    Text(String),
    Photo {
        file_id: String,
        caption: Option<String>,
    },
}

/// Content to deliver to a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutgoingContent {
    Text(String),
    Photo {
        file_id: String,
        caption: Option<String>,
    },
}

impl OutgoingContent {
    pub fn text(text: impl Into<String>) -> Self {
        OutgoingContent::Text(text.into())
    }
}

impl From<MessageContent> for OutgoingContent {
    fn from(content: MessageContent) -> Self {
        match content {
            MessageContent::Text(text) => OutgoingContent::Text(text),
            MessageContent::Photo { file_id, caption } => {
                OutgoingContent::Photo { file_id, caption }
            }
        }
    }
}

/// Parsed message for bot processing.
#[derive(Debug, Clone)]
pub struct BotMessage {
    /// Chat the message came from; doubles as the sender's identity.
    pub chat_id: i64,
    /// Display name of the sender, if known.
    pub sender_name: Option<String>,
    pub content: MessageContent,
    /// Unix timestamp.
    pub timestamp: i64,
}

impl BotMessage {
    /// Extract a bot message from an update. Returns `None` for updates
    /// that carry neither text nor a photo.
    pub fn from_update(update: &Update) -> Option<Self> {
        let msg = update.message.as_ref()?;

        let content = if let Some(text) = &msg.text {
            MessageContent::Text(text.clone())
        } else {
            // Telegram lists sizes smallest first
            let largest = msg.photo.as_ref()?.last()?;
            MessageContent::Photo {
                file_id: largest.file_id.clone(),
                caption: msg.caption.clone(),
            }
        };

        Some(Self {
            chat_id: msg.chat.id,
            sender_name: msg.from.as_ref().map(|u| u.first_name.clone()),
            content,
            timestamp: msg.date,
        })
    }

    /// Message text, if this is a text message.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text(text) => Some(text),
            MessageContent::Photo { .. } => None,
        }
    }

    /// Split a `/command[@bot] argument` message into name and argument.
    pub fn command(&self) -> Option<(&str, &str)> {
        let rest = self.text()?.strip_prefix('/')?;
        let (head, argument) = match rest.split_once(char::is_whitespace) {
            Some((head, argument)) => (head, argument.trim()),
            None => (rest, ""),
        };
        let name = head.split('@').next().unwrap_or(head);
        if name.is_empty() {
            return None;
        }
        Some((name, argument))
    }
}
