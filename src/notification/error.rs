//! Error types for notification delivery.

use thiserror::Error;

use super::template::TemplateServiceError;
use crate::{http_client::HttpClientPoolError, persistence::PersistenceError, telegram::ChatError};

/// Why a channel could not reach a recipient, or could not list them.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The message text could not be rendered.
    #[error("Template rendering error: {0}")]
    TemplateError(#[from] TemplateServiceError),

    /// The provider request did not complete.
    #[error("Request error: {0}")]
    RequestError(String),

    /// The provider answered with a non-success status.
    #[error("Provider rejected the message with HTTP {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// The chat provider failed.
    #[error("Chat error: {0}")]
    ChatError(#[from] ChatError),

    /// The subscriber list could not be read.
    #[error("Subscriber registry error: {0}")]
    RegistryError(#[from] PersistenceError),

    /// An error originating from the HTTP client pool.
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] HttpClientPoolError),
}

impl From<reqwest_middleware::Error> for NotificationError {
    fn from(error: reqwest_middleware::Error) -> Self {
        NotificationError::RequestError(error.to_string())
    }
}

impl NotificationError {
    /// Builds a `Rejected` error, keeping at most 200 characters of the body.
    pub fn rejected(status: u16, body: &str) -> Self {
        NotificationError::Rejected { status, body: body.chars().take(200).collect() }
    }
}
