use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use super::{
    BaseHttpClientConfig, EmailSettings, FetchConfig, HttpRetryConfig, NotificationTemplates,
    RegistryConfig, SmsSettings, TelegramSettings,
};
use crate::models::MonitoredEvent;

/// Application configuration for resale-watch.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The monitored event.
    pub event: MonitoredEvent,

    /// Fetch strategy chain settings.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Subscriber registry backend.
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Telegram bot used for commands and chat notifications.
    #[serde(default)]
    pub telegram: TelegramSettings,

    /// Email relay settings.
    #[serde(default)]
    pub email: EmailSettings,

    /// SMS provider settings.
    #[serde(default)]
    pub sms: SmsSettings,

    /// Notification message templates.
    #[serde(default)]
    pub templates: NotificationTemplates,

    /// Retry policy for calls to notification providers.
    #[serde(default)]
    pub http_retry_config: HttpRetryConfig,

    /// Configuration for the pooled provider HTTP clients.
    #[serde(default)]
    pub http_base_config: BaseHttpClientConfig,
}

impl AppConfig {
    /// Loads `<config_dir>/app.yaml` (optional) overlaid by `RESALE_WATCH__*`
    /// environment variables.
    pub fn new(config_dir: Option<&str>) -> Result<Self, ConfigError> {
        let config_dir = config_dir.unwrap_or("configs");
        let app_yaml = Path::new(config_dir).join("app.yaml");
        let s = Config::builder()
            .add_source(File::from(app_yaml).required(false))
            .add_source(Environment::with_prefix("RESALE_WATCH").separator("__"))
            .build()?;
        s.try_deserialize()
    }

    /// Creates a new `AppConfigBuilder` for testing purposes.
    #[cfg(test)]
    pub fn builder(event: MonitoredEvent) -> AppConfigBuilder {
        AppConfigBuilder {
            config: AppConfig {
                event,
                fetch: FetchConfig::default(),
                registry: RegistryConfig::default(),
                telegram: TelegramSettings::default(),
                email: EmailSettings::default(),
                sms: SmsSettings::default(),
                templates: NotificationTemplates::default(),
                http_retry_config: HttpRetryConfig::default(),
                http_base_config: BaseHttpClientConfig::default(),
            },
        }
    }
}

/// A builder for creating `AppConfig` instances for testing.
#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn fetch(mut self, fetch: FetchConfig) -> Self {
        self.config.fetch = fetch;
        self
    }

    pub fn registry(mut self, registry: RegistryConfig) -> Self {
        self.config.registry = registry;
        self
    }

    pub fn telegram(mut self, telegram: TelegramSettings) -> Self {
        self.config.telegram = telegram;
        self
    }

    pub fn email(mut self, email: EmailSettings) -> Self {
        self.config.email = email;
        self
    }

    pub fn sms(mut self, sms: SmsSettings) -> Self {
        self.config.sms = sms;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
