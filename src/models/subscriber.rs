//! Notification targets managed through chat commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat notification target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subscriber {
    /// Channel specific opaque identifier (a chat id).
    pub id: String,
    /// When the subscriber registered, if known.
    pub registered_at: Option<DateTime<Utc>>,
}

impl Subscriber {
    /// A subscriber registering right now.
    pub fn registered_now(id: impl Into<String>) -> Self {
        Self { id: id.into(), registered_at: Some(Utc::now()) }
    }
}
