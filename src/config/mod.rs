//! Configuration module for resale-watch.

mod app_config;
mod channels;
mod fetch;
mod helpers;
mod http_base;
mod http_retry;
mod registry;
mod templates;

pub use app_config::AppConfig;
pub use channels::{
    EmailConfig, EmailSettings, SmsConfig, SmsSettings, TelegramConfig, TelegramSettings,
};
pub use fetch::FetchConfig;
pub use helpers::{
    deserialize_comma_list, deserialize_duration_from_ms, deserialize_duration_from_seconds,
    serialize_duration_to_ms, serialize_duration_to_seconds,
};
pub use http_base::BaseHttpClientConfig;
pub use http_retry::{HttpRetryConfig, JitterSetting};
pub use registry::RegistryConfig;
pub use templates::NotificationTemplates;
