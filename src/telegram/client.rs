//! HTTP client for the Telegram Bot API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Response;
use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::{
    ChatApi,
    error::ChatError,
    types::{ApiResponse, SendMessage, Update},
};
use crate::config::TelegramConfig;

/// Talks to `<api_base>/bot<token>/<method>`.
pub struct TelegramClient {
    http: Arc<ClientWithMiddleware>,
    bot_base: String,
}

impl TelegramClient {
    /// Creates a client using a pooled HTTP client.
    pub fn new(config: &TelegramConfig, http: Arc<ClientWithMiddleware>) -> Self {
        let bot_base = format!(
            "{}/bot{}",
            config.api_base.as_str().trim_end_matches('/'),
            config.bot_token
        );
        Self { http, bot_base }
    }

    fn method_url(&self, method: &str) -> Result<Url, ChatError> {
        Ok(Url::parse(&format!("{}/{method}", self.bot_base))?)
    }

    async fn get_updates(&self, query: &[(&str, String)]) -> Result<Vec<Update>, ChatError> {
        let response = self.http.get(self.method_url("getUpdates")?).query(query).send().await?;
        let raw: Vec<Value> = decode(response).await?;

        let total = raw.len();
        let updates: Vec<Update> = raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(update) => Some(update),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed chat update.");
                    None
                }
            })
            .collect();
        tracing::debug!(received = total, usable = updates.len(), "Fetched chat updates.");
        Ok(updates)
    }
}

/// Unwraps the Bot API envelope, turning non-2xx answers and `ok: false`
/// into [`ChatError::Api`].
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ChatError> {
    let status = response.status();
    let body = response.text().await?;

    let envelope: ApiResponse<T> = match serde_json::from_str(&body) {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => return Err(ChatError::Decode(e.to_string())),
        Err(_) => {
            return Err(ChatError::Api { status: status.as_u16(), description: body });
        }
    };

    match (status.is_success() && envelope.ok, envelope.result) {
        (true, Some(result)) => Ok(result),
        (true, None) => Err(ChatError::Decode("response has no result".into())),
        (false, _) => Err(ChatError::Api {
            status: status.as_u16(),
            description: envelope.description.unwrap_or_default(),
        }),
    }
}

#[async_trait]
impl ChatApi for TelegramClient {
    async fn fetch_updates(&self, limit: u32) -> Result<Vec<Update>, ChatError> {
        self.get_updates(&[("limit", limit.to_string())]).await
    }

    async fn acknowledge(&self, offset: i64) -> Result<(), ChatError> {
        self.get_updates(&[("offset", offset.to_string()), ("limit", "1".to_string())]).await?;
        tracing::debug!(offset, "Acknowledged chat updates.");
        Ok(())
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), ChatError> {
        let body = SendMessage { chat_id, text, parse_mode: "Markdown" };
        let response = self.http.post(self.method_url("sendMessage")?).json(&body).send().await?;
        let _: Value = decode(response).await?;
        Ok(())
    }
}
