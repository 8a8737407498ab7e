//! Wire types of the Telegram Bot API, limited to the fields in use.

use serde::{Deserialize, Serialize};

/// Envelope of every Bot API answer.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded.
    pub ok: bool,
    /// The payload, present when `ok` is true.
    pub result: Option<T>,
    /// Error text, present when `ok` is false.
    pub description: Option<String>,
}

/// One inbound update.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Update {
    /// Monotonic update identifier.
    pub update_id: i64,
    /// The message, absent for update kinds we do not handle.
    #[serde(default)]
    pub message: Option<Message>,
}

/// An inbound chat message.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// The chat the message was sent in.
    pub chat: Chat,
    /// Text content; absent for stickers, photos and the like.
    #[serde(default)]
    pub text: Option<String>,
    /// The sender.
    #[serde(default)]
    pub from: Option<User>,
}

/// A chat.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Chat {
    /// Chat identifier.
    pub id: i64,
}

/// A message sender.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct User {
    /// First name, if shared.
    #[serde(default)]
    pub first_name: Option<String>,
}

/// Body of a `sendMessage` call.
#[derive(Debug, Serialize)]
pub struct SendMessage<'a> {
    /// Target chat, as a string so arbitrary ids pass through unchanged.
    pub chat_id: &'a str,
    /// Message text.
    pub text: &'a str,
    /// Text formatting mode.
    pub parse_mode: &'static str,
}

impl Update {
    /// A builder-style constructor used by tests and fixtures.
    pub fn text(update_id: i64, chat_id: i64, text: &str, first_name: Option<&str>) -> Self {
        Update {
            update_id,
            message: Some(Message {
                chat: Chat { id: chat_id },
                text: Some(text.to_string()),
                from: Some(User { first_name: first_name.map(str::to_owned) }),
            }),
        }
    }
}
