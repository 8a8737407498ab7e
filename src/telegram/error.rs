//! Errors raised while talking to the chat provider.

use thiserror::Error;

/// Errors from the chat provider API.
///
/// Messages never contain the request URL, which embeds the bot token.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The request could not be completed.
    #[error("Chat API request failed: {0}")]
    Transport(String),

    /// The API answered with an error.
    #[error("Chat API returned HTTP {status}: {description}")]
    Api {
        /// HTTP status of the answer.
        status: u16,
        /// The API's error description, if it gave one.
        description: String,
    },

    /// The answer could not be decoded.
    #[error("Failed to decode chat API response: {0}")]
    Decode(String),

    /// The configured API base does not form a valid URL.
    #[error("Invalid chat API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<reqwest_middleware::Error> for ChatError {
    fn from(error: reqwest_middleware::Error) -> Self {
        match error {
            reqwest_middleware::Error::Reqwest(e) => ChatError::Transport(e.without_url().to_string()),
            other => ChatError::Transport(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(error: reqwest::Error) -> Self {
        ChatError::Decode(error.without_url().to_string())
    }
}
