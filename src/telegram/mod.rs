//! The chat provider used for subscriber commands and chat notifications.

mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

pub use client::TelegramClient;
pub use error::ChatError;
pub use types::{Chat, Message, Update, User};

/// Operations the rest of the crate needs from a chat provider.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Returns up to `limit` pending updates, oldest first.
    async fn fetch_updates(&self, limit: u32) -> Result<Vec<Update>, ChatError>;

    /// Confirms every update with an id lower than `offset`.
    async fn acknowledge(&self, offset: i64) -> Result<(), ChatError>;

    /// Sends a Markdown formatted message to a chat.
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), ChatError>;
}
