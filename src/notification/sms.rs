//! SMS delivery through a Twilio compatible messaging API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use url::Url;

use super::{Notifier, error::NotificationError, template::MessageTemplates};
use crate::{
    config::SmsConfig,
    models::{Channel, NotificationEvent},
};

/// Sends the SMS template to the configured phone numbers.
pub struct SmsNotifier {
    http: Arc<ClientWithMiddleware>,
    config: SmsConfig,
    messages_url: Url,
    templates: Arc<MessageTemplates>,
}

impl SmsNotifier {
    /// Creates an SMS notifier using a pooled HTTP client.
    pub fn new(
        http: Arc<ClientWithMiddleware>,
        config: SmsConfig,
        templates: Arc<MessageTemplates>,
    ) -> Result<Self, url::ParseError> {
        let messages_url = Url::parse(&format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            config.api_base.as_str().trim_end_matches('/'),
            config.account_sid
        ))?;
        Ok(Self { http, config, messages_url, templates })
    }
}

#[async_trait]
impl Notifier for SmsNotifier {
    fn channel(&self) -> Channel {
        Channel::Sms
    }

    async fn recipients(&self) -> Result<Vec<String>, NotificationError> {
        Ok(self.config.recipients.clone())
    }

    async fn deliver(&self, recipient: &str, event: &NotificationEvent) -> Result<(), NotificationError> {
        let text = self.templates.sms(event)?;
        let form = [("From", self.config.from_number.as_str()), ("To", recipient), ("Body", text.as_str())];

        let response = self
            .http
            .post(self.messages_url.clone())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::rejected(status.as_u16(), &body));
        }
        Ok(())
    }
}
