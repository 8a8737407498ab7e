//! # Notification Dispatch
//!
//! Fans a positive detection out to the subscriber-facing channels.
//!
//! ## Core Components
//!
//! - **`Notifier` Trait**: one delivery channel. It names its channel, lists
//!   its recipients and delivers a single message to a single recipient.
//! - **`ChatNotifier`**, **`EmailNotifier`**, **`SmsNotifier`**: the channel
//!   implementations. Chat recipients come from the subscriber registry, email
//!   and SMS recipients from configuration.
//! - **`MessageTemplates`**: renders the configured minijinja templates for
//!   each channel.
//! - **`NotificationDispatcher`**: walks every channel and recipient, isolating
//!   failures, and returns a per-channel `DispatchSummary`.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::models::{Channel, NotificationEvent};

mod chat;
mod dispatcher;
mod email;
pub mod error;
mod sms;
mod template;

pub use chat::ChatNotifier;
pub use dispatcher::{ChannelSummary, DispatchSummary, NotificationDispatcher};
pub use email::EmailNotifier;
pub use error::NotificationError;
pub use sms::SmsNotifier;
pub use template::{EmailMessage, MessageTemplates, TemplateService, TemplateServiceError};

/// A delivery channel.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// The channel this notifier delivers through.
    fn channel(&self) -> Channel;

    /// Everyone who should receive the next notification.
    async fn recipients(&self) -> Result<Vec<String>, NotificationError>;

    /// Delivers `event` to one recipient.
    async fn deliver(&self, recipient: &str, event: &NotificationEvent) -> Result<(), NotificationError>;
}
