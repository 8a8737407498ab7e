//! Chat broadcast to every registered subscriber.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Notifier, error::NotificationError, template::MessageTemplates};
use crate::{
    models::{Channel, NotificationEvent},
    persistence::SubscriberRegistry,
    telegram::ChatApi,
};

/// Sends the chat template to each id in the subscriber registry.
pub struct ChatNotifier {
    chat: Arc<dyn ChatApi>,
    registry: Arc<dyn SubscriberRegistry>,
    templates: Arc<MessageTemplates>,
}

impl ChatNotifier {
    /// Creates a chat notifier.
    pub fn new(
        chat: Arc<dyn ChatApi>,
        registry: Arc<dyn SubscriberRegistry>,
        templates: Arc<MessageTemplates>,
    ) -> Self {
        Self { chat, registry, templates }
    }
}

#[async_trait]
impl Notifier for ChatNotifier {
    fn channel(&self) -> Channel {
        Channel::Chat
    }

    async fn recipients(&self) -> Result<Vec<String>, NotificationError> {
        Ok(self.registry.list().await?.into_iter().collect())
    }

    async fn deliver(&self, recipient: &str, event: &NotificationEvent) -> Result<(), NotificationError> {
        let text = self.templates.chat(event)?;
        self.chat.send_message(recipient, &text).await?;
        Ok(())
    }
}
