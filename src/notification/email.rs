//! Email delivery through an HTTP mail relay.
//!
//! Each recipient gets its own request:
//!
//! ```text
//! POST <api_url>
//! Authorization: Bearer <api_key>
//! {"from": "...", "to": ["..."], "subject": "...", "text": "..."}
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;

use super::{Notifier, error::NotificationError, template::MessageTemplates};
use crate::{
    config::EmailConfig,
    models::{Channel, NotificationEvent},
};

#[derive(Serialize)]
struct RelayRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

/// Sends the email templates to the configured addresses.
pub struct EmailNotifier {
    http: Arc<ClientWithMiddleware>,
    config: EmailConfig,
    templates: Arc<MessageTemplates>,
}

impl EmailNotifier {
    /// Creates an email notifier using a pooled HTTP client.
    pub fn new(
        http: Arc<ClientWithMiddleware>,
        config: EmailConfig,
        templates: Arc<MessageTemplates>,
    ) -> Self {
        Self { http, config, templates }
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    async fn recipients(&self) -> Result<Vec<String>, NotificationError> {
        Ok(self.config.recipients.clone())
    }

    async fn deliver(&self, recipient: &str, event: &NotificationEvent) -> Result<(), NotificationError> {
        let message = self.templates.email(event)?;
        let body = RelayRequest {
            from: &self.config.from,
            to: [recipient],
            subject: &message.subject,
            text: &message.text,
        };

        let response = self
            .http
            .post(self.config.api_url.clone())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(NotificationError::rejected(status.as_u16(), &text));
        }
        Ok(())
    }
}
