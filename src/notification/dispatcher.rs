//! Fan-out of one positive detection to every configured channel.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use super::Notifier;
use crate::models::{Channel, NotificationEvent};

/// Delivery counts for one channel.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ChannelSummary {
    /// Deliveries attempted.
    pub attempted: usize,
    /// Deliveries that succeeded.
    pub succeeded: usize,
    /// Deliveries that failed.
    pub failed: usize,
    /// Set when the channel's recipients could not be determined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-channel results of one dispatch.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct DispatchSummary {
    /// One entry per configured channel.
    pub channels: BTreeMap<Channel, ChannelSummary>,
}

impl DispatchSummary {
    /// The summary of `channel`, if it is configured.
    pub fn channel(&self, channel: Channel) -> Option<&ChannelSummary> {
        self.channels.get(&channel)
    }

    /// Successful deliveries across all channels.
    pub fn total_succeeded(&self) -> usize {
        self.channels.values().map(|c| c.succeeded).sum()
    }

    /// Failed deliveries across all channels.
    pub fn total_failed(&self) -> usize {
        self.channels.values().map(|c| c.failed).sum()
    }
}

/// Sends a [`NotificationEvent`] through every notifier, one recipient at a
/// time. A failing recipient or channel never stops the others.
pub struct NotificationDispatcher {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotificationDispatcher {
    /// Creates a dispatcher over the configured notifiers.
    pub fn new(notifiers: Vec<Box<dyn Notifier>>) -> Self {
        Self { notifiers }
    }

    /// The configured channels, in dispatch order.
    pub fn channels(&self) -> Vec<Channel> {
        self.notifiers.iter().map(|n| n.channel()).collect()
    }

    /// Delivers `event` to all recipients of all channels.
    #[tracing::instrument(skip_all, fields(event = %event.event_label))]
    pub async fn dispatch(&self, event: &NotificationEvent) -> DispatchSummary {
        let mut summary = DispatchSummary::default();

        for notifier in &self.notifiers {
            let channel = notifier.channel();
            let entry = summary.channels.entry(channel).or_default();

            let recipients = match notifier.recipients().await {
                Ok(recipients) => recipients,
                Err(e) => {
                    tracing::error!(%channel, error = %e, "Could not determine recipients, skipping channel.");
                    entry.error = Some(e.to_string());
                    continue;
                }
            };

            let mut seen = HashSet::new();
            for recipient in recipients.iter().filter(|r| seen.insert(r.as_str())) {
                entry.attempted += 1;
                match notifier.deliver(recipient, event).await {
                    Ok(()) => {
                        entry.succeeded += 1;
                        tracing::debug!(%channel, recipient = %recipient, "Notification delivered.");
                    }
                    Err(e) => {
                        entry.failed += 1;
                        tracing::error!(%channel, recipient = %recipient, error = %e, "Notification delivery failed.");
                    }
                }
            }

            tracing::info!(
                %channel,
                attempted = entry.attempted,
                succeeded = entry.succeeded,
                failed = entry.failed,
                "Channel dispatch finished."
            );
        }

        summary
    }
}
