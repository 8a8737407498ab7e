//! This module provides the `SupervisorBuilder` for constructing a `Supervisor`.

use std::sync::Arc;

use super::{EventCheck, Supervisor, SupervisorError};
use crate::{
    commands::CommandProcessor,
    config::AppConfig,
    http_client::HttpClientPool,
    notification::{
        ChatNotifier, EmailNotifier, MessageTemplates, NotificationDispatcher, Notifier,
        SmsNotifier,
    },
    persistence::{SubscriberRegistry, open_registry},
    telegram::{ChatApi, TelegramClient},
};

const DEFAULT_UPDATE_BATCH_LIMIT: u32 = 100;

/// A builder for creating a `Supervisor` instance.
#[derive(Default)]
pub struct SupervisorBuilder {
    config: Option<AppConfig>,
    registry: Option<Arc<dyn SubscriberRegistry>>,
    chat: Option<Arc<dyn ChatApi>>,
    http_pool: Option<Arc<HttpClientPool>>,
}

impl SupervisorBuilder {
    /// Creates a new, empty `SupervisorBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the application configuration for the `Supervisor`.
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Uses `registry` instead of opening the configured backend.
    pub fn registry(mut self, registry: Arc<dyn SubscriberRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Uses `chat` instead of building a Telegram client.
    pub fn chat(mut self, chat: Arc<dyn ChatApi>) -> Self {
        self.chat = Some(chat);
        self
    }

    /// Shares an existing HTTP client pool.
    pub fn http_pool(mut self, http_pool: Arc<HttpClientPool>) -> Self {
        self.http_pool = Some(http_pool);
        self
    }

    /// Assembles and validates the components to build a `Supervisor`.
    pub async fn build(self) -> Result<Supervisor, SupervisorError> {
        let config = self.config.ok_or(SupervisorError::MissingConfig)?;

        let check = EventCheck::from_config(&config)?;

        let registry = match self.registry {
            Some(registry) => registry,
            None => open_registry(&config.registry).await?,
        };
        let http_pool = self
            .http_pool
            .unwrap_or_else(|| Arc::new(HttpClientPool::new(config.http_base_config.clone())));
        let retry_policy = &config.http_retry_config;
        let templates = Arc::new(MessageTemplates::new(config.templates.clone()));

        let telegram = config.telegram.resolve();
        let chat: Option<Arc<dyn ChatApi>> = match (self.chat, &telegram) {
            (Some(chat), _) => Some(chat),
            (None, Some(telegram)) => {
                let http = http_pool.get_or_create(retry_policy).await?;
                Some(Arc::new(TelegramClient::new(telegram, http)))
            }
            (None, None) => {
                tracing::info!(channel = "chat", "Channel not configured.");
                None
            }
        };
        let batch_limit =
            telegram.as_ref().map_or(DEFAULT_UPDATE_BATCH_LIMIT, |t| t.update_batch_limit);

        let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();
        if let Some(chat) = &chat {
            notifiers.push(Box::new(ChatNotifier::new(
                Arc::clone(chat),
                Arc::clone(&registry),
                Arc::clone(&templates),
            )));
        }
        match config.email.resolve() {
            Some(email) => {
                let http = http_pool.get_or_create(retry_policy).await?;
                notifiers.push(Box::new(EmailNotifier::new(http, email, Arc::clone(&templates))));
            }
            None => tracing::info!(channel = "email", "Channel not configured."),
        }
        match config.sms.resolve() {
            Some(sms) => {
                let http = http_pool.get_or_create(retry_policy).await?;
                let notifier = SmsNotifier::new(http, sms, Arc::clone(&templates)).map_err(|e| {
                    SupervisorError::InvalidConfiguration(format!("SMS API URL: {e}"))
                })?;
                notifiers.push(Box::new(notifier));
            }
            None => tracing::info!(channel = "sms", "Channel not configured."),
        }

        let commands = chat
            .map(|chat| CommandProcessor::new(chat, Arc::clone(&registry), batch_limit));
        let dispatcher = NotificationDispatcher::new(notifiers);

        tracing::info!(
            event = %config.event.label,
            strategies = check.chain().strategies().len(),
            channels = ?dispatcher.channels(),
            "Supervisor assembled."
        );

        Ok(Supervisor {
            check,
            registry,
            commands,
            dispatcher,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{EmailSettings, FetchConfig, TelegramSettings},
        models::Channel,
        persistence::traits::MockSubscriberRegistry,
        telegram::MockChatApi,
        test_helpers::test_event,
    };

    fn config() -> AppConfig {
        AppConfig::builder(test_event("https://tickets.example")).build()
    }

    #[tokio::test]
    async fn build_fails_if_config_is_missing() {
        let result = SupervisorBuilder::new()
            .registry(Arc::new(MockSubscriberRegistry::new()))
            .build()
            .await;
        assert!(matches!(result, Err(SupervisorError::MissingConfig)));
    }

    #[tokio::test]
    async fn build_without_channels_has_no_notifiers() {
        let supervisor = SupervisorBuilder::new()
            .config(config())
            .registry(Arc::new(MockSubscriberRegistry::new()))
            .build()
            .await
            .unwrap();
        assert!(supervisor.dispatcher().channels().is_empty());
        assert!(supervisor.commands.is_none());
    }

    #[tokio::test]
    async fn build_wires_configured_channels() {
        let config = AppConfig::builder(test_event("https://tickets.example"))
            .telegram(TelegramSettings { bot_token: Some("123:abc".into()), ..Default::default() })
            .email(EmailSettings {
                api_url: Some("https://mail.example/send".parse().unwrap()),
                api_key: Some("key".into()),
                from: Some("monitor@example.com".into()),
                recipients: vec!["a@example.com".into()],
            })
            .build();

        let supervisor = SupervisorBuilder::new()
            .config(config)
            .registry(Arc::new(MockSubscriberRegistry::new()))
            .build()
            .await
            .unwrap();

        assert_eq!(supervisor.dispatcher().channels(), vec![Channel::Chat, Channel::Email]);
        assert!(supervisor.commands.is_some());
    }

    #[tokio::test]
    async fn injected_chat_enables_commands() {
        let supervisor = SupervisorBuilder::new()
            .config(config())
            .registry(Arc::new(MockSubscriberRegistry::new()))
            .chat(Arc::new(MockChatApi::new()))
            .build()
            .await
            .unwrap();
        assert_eq!(supervisor.dispatcher().channels(), vec![Channel::Chat]);
    }

    #[tokio::test]
    async fn build_rejects_empty_strategy_list() {
        let config = AppConfig::builder(test_event("https://tickets.example"))
            .fetch(FetchConfig { strategies: Vec::new(), ..Default::default() })
            .build();
        let result = SupervisorBuilder::new()
            .config(config)
            .registry(Arc::new(MockSubscriberRegistry::new()))
            .build()
            .await;
        assert!(matches!(result, Err(SupervisorError::InvalidConfiguration(_))));
    }
}
