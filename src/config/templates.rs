use serde::Deserialize;

fn default_chat() -> String {
    "🎟️ *RESALE AVAILABLE: {{ event_label | markdown_escape }}*\n\n\
     Check now: {{ event_url | markdown_escape }}\n\n\
     Hurry - they go fast!"
        .to_string()
}

fn default_email_subject() -> String {
    "🎟️ Resale Tickets Available for {{ event_label }}!".to_string()
}

fn default_email_body() -> String {
    "Great news! Resale tickets are now available for {{ event_label }}.\n\n\
     Check them out here: {{ event_url }}\n\n\
     Hurry - they might go fast!"
        .to_string()
}

fn default_sms() -> String {
    "Resale tickets available for {{ event_label }}: {{ event_url }}".to_string()
}

/// Message templates, rendered with the variables `event_label`,
/// `event_url` and `ticket_count`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NotificationTemplates {
    /// Chat broadcast text (Telegram Markdown).
    #[serde(default = "default_chat")]
    pub chat: String,
    /// Email subject line.
    #[serde(default = "default_email_subject")]
    pub email_subject: String,
    /// Email plain text body.
    #[serde(default = "default_email_body")]
    pub email_body: String,
    /// SMS text.
    #[serde(default = "default_sms")]
    pub sms: String,
}

impl Default for NotificationTemplates {
    fn default() -> Self {
        Self {
            chat: default_chat(),
            email_subject: default_email_subject(),
            email_body: default_email_body(),
            sms: default_sms(),
        }
    }
}
