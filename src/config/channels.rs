//! Provider settings for the notification and command channels.
//!
//! Every field is optional so that a half-filled section (for example a bot
//! token exported without anything else) loads fine. `resolve` turns a
//! section into the settings a channel needs, or `None` when the channel
//! cannot run.

use serde::Deserialize;
use url::Url;

use super::deserialize_comma_list;

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
}

fn default_telegram_api() -> Option<Url> {
    Url::parse("https://api.telegram.org").ok()
}

fn default_twilio_api() -> Option<Url> {
    Url::parse("https://api.twilio.com").ok()
}

fn default_update_batch_limit() -> u32 {
    100
}

/// Raw `telegram` section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TelegramSettings {
    /// Bot token issued by BotFather.
    #[serde(default)]
    pub bot_token: Option<String>,
    /// Base URL of the Bot API.
    #[serde(default = "default_telegram_api")]
    pub api_base: Option<Url>,
    /// Maximum number of updates processed per cycle.
    #[serde(default = "default_update_batch_limit")]
    pub update_batch_limit: u32,
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_base: default_telegram_api(),
            update_batch_limit: default_update_batch_limit(),
        }
    }
}

/// Settings of a usable Telegram bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    /// Bot token.
    pub bot_token: String,
    /// Base URL of the Bot API.
    pub api_base: Url,
    /// Maximum number of updates processed per cycle.
    pub update_batch_limit: u32,
}

impl TelegramSettings {
    /// The bot settings, if a token is present.
    pub fn resolve(&self) -> Option<TelegramConfig> {
        Some(TelegramConfig {
            bot_token: non_empty(&self.bot_token)?,
            api_base: self.api_base.clone()?,
            update_batch_limit: self.update_batch_limit.max(1),
        })
    }
}

/// Raw `email` section. Mail goes out through an HTTP mail relay.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct EmailSettings {
    /// Endpoint accepting `{from, to, subject, text}` JSON posts.
    #[serde(default)]
    pub api_url: Option<Url>,
    /// Bearer key for the relay.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Sender address.
    #[serde(default)]
    pub from: Option<String>,
    /// Recipient addresses, a list or a comma separated string.
    #[serde(default, deserialize_with = "deserialize_comma_list")]
    pub recipients: Vec<String>,
}

/// Settings of a usable email channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    /// Relay endpoint.
    pub api_url: Url,
    /// Bearer key.
    pub api_key: String,
    /// Sender address.
    pub from: String,
    /// At least one recipient address.
    pub recipients: Vec<String>,
}

impl EmailSettings {
    /// The email settings, if every field is present and there is at least
    /// one recipient.
    pub fn resolve(&self) -> Option<EmailConfig> {
        if self.recipients.is_empty() {
            return None;
        }
        Some(EmailConfig {
            api_url: self.api_url.clone()?,
            api_key: non_empty(&self.api_key)?,
            from: non_empty(&self.from)?,
            recipients: self.recipients.clone(),
        })
    }
}

/// Raw `sms` section for a Twilio compatible API.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SmsSettings {
    /// Base URL of the messaging API.
    #[serde(default = "default_twilio_api")]
    pub api_base: Option<Url>,
    /// Account SID, also the basic auth user.
    #[serde(default)]
    pub account_sid: Option<String>,
    /// Auth token, the basic auth password.
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Sending phone number.
    #[serde(default)]
    pub from_number: Option<String>,
    /// Recipient phone numbers, a list or a comma separated string.
    #[serde(default, deserialize_with = "deserialize_comma_list")]
    pub recipients: Vec<String>,
}

impl Default for SmsSettings {
    fn default() -> Self {
        Self {
            api_base: default_twilio_api(),
            account_sid: None,
            auth_token: None,
            from_number: None,
            recipients: Vec::new(),
        }
    }
}

/// Settings of a usable SMS channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsConfig {
    /// Base URL of the messaging API.
    pub api_base: Url,
    /// Account SID.
    pub account_sid: String,
    /// Auth token.
    pub auth_token: String,
    /// Sending phone number.
    pub from_number: String,
    /// At least one recipient number.
    pub recipients: Vec<String>,
}

impl SmsSettings {
    /// The SMS settings, if credentials, a sender and recipients are present.
    pub fn resolve(&self) -> Option<SmsConfig> {
        if self.recipients.is_empty() {
            return None;
        }
        Some(SmsConfig {
            api_base: self.api_base.clone()?,
            account_sid: non_empty(&self.account_sid)?,
            auth_token: non_empty(&self.auth_token)?,
            from_number: non_empty(&self.from_number)?,
            recipients: self.recipients.clone(),
        })
    }
}
