//! A monitored event and configuration pointing at a local test server.

use std::time::Duration;

use url::Url;

use crate::{
    config::{
        AppConfig, BaseHttpClientConfig, EmailSettings, FetchConfig, HttpRetryConfig,
        JitterSetting, NotificationTemplates, RegistryConfig, SmsSettings, TelegramSettings,
    },
    models::{DetectionConfig, MonitoredEvent},
};

fn join(base: &str, path: &str) -> Url {
    let base = base.trim_end_matches('/');
    Url::parse(&format!("{base}{path}"))
        .unwrap_or_else(|e| panic!("invalid test URL {base}{path}: {e}"))
}

/// The "Seven Stars" event served under `base`.
pub fn test_event(base: &str) -> MonitoredEvent {
    MonitoredEvent {
        label: "Seven Stars".to_string(),
        page_url: join(base, "/events/seven-stars-135703"),
        site_root: join(base, "/"),
        api_base: join(base, "/api/events"),
        event_id: 135703,
        detection: DetectionConfig::default(),
    }
}

/// A configuration for `event` with pacing disabled, fast retries and no
/// channels. Fields are public, so tests adjust what they need.
pub fn test_config(event: MonitoredEvent) -> AppConfig {
    AppConfig {
        event,
        fetch: FetchConfig { pacing_factor: 0.0, ..FetchConfig::default() },
        registry: RegistryConfig::default(),
        telegram: TelegramSettings::default(),
        email: EmailSettings::default(),
        sms: SmsSettings::default(),
        templates: NotificationTemplates::default(),
        http_retry_config: HttpRetryConfig {
            max_retries: 1,
            initial_backoff_ms: Duration::from_millis(1),
            max_backoff_secs: Duration::from_millis(5),
            jitter: JitterSetting::None,
            ..HttpRetryConfig::default()
        },
        http_base_config: BaseHttpClientConfig::default(),
    }
}
