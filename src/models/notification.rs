//! Data models for notifications.

use std::fmt;

use serde::Serialize;

use super::{event::MonitoredEvent, resale::ResaleResult};

/// An outbound delivery channel.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Chat broadcast to registered subscribers.
    Chat,
    /// Email to the configured recipients.
    Email,
    /// SMS to the configured phone numbers.
    Sms,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::Chat => "chat",
            Channel::Email => "email",
            Channel::Sms => "sms",
        };
        f.write_str(name)
    }
}

/// One positive detection, handed from the evaluator to the dispatcher.
///
/// Channels render their own message text from [`NotificationEvent::context`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NotificationEvent {
    /// Label of the monitored event.
    pub event_label: String,
    /// Where subscribers can buy the tickets.
    pub event_url: String,
    /// Number of resale items or markers found.
    pub ticket_count: usize,
}

impl NotificationEvent {
    /// Builds the event for a positive result.
    pub fn from_detection(event: &MonitoredEvent, result: &ResaleResult) -> Self {
        Self {
            event_label: event.label.clone(),
            event_url: event.page_url.to_string(),
            ticket_count: result.matched_count,
        }
    }

    /// Template context exposed to message templates.
    pub fn context(&self) -> serde_json::Value {
        serde_json::json!({
            "event_label": self.event_label,
            "event_url": self.event_url,
            "ticket_count": self.ticket_count,
        })
    }
}
