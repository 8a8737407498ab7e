//! The event being watched and the markers that identify resale inventory on it.

use serde::{Deserialize, Serialize};
use url::Url;

fn default_collection_name() -> String {
    "Festival Passes".to_string()
}

fn default_available_resale_state() -> String {
    "AVAILABLE".to_string()
}

fn default_markup_attribute() -> String {
    "state".to_string()
}

fn default_markup_value() -> String {
    "RESALE".to_string()
}

/// Values that mark a sale item as offered on the resale market.
///
/// All comparisons against these values are exact and case sensitive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetectionConfig {
    /// Name of the collection whose sale items are watched.
    #[serde(default = "default_collection_name")]
    pub collection_name: String,

    /// The `resaleState` value meaning resale tickets can be bought.
    #[serde(default = "default_available_resale_state")]
    pub available_resale_state: String,

    /// Attribute carried by page elements that describe a sale item's state.
    #[serde(default = "default_markup_attribute")]
    pub markup_attribute: String,

    /// Attribute value marking a resale listing in the page markup.
    #[serde(default = "default_markup_value")]
    pub markup_value: String,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            collection_name: default_collection_name(),
            available_resale_state: default_available_resale_state(),
            markup_attribute: default_markup_attribute(),
            markup_value: default_markup_value(),
        }
    }
}

/// The single event monitored by a deployment. Loaded at startup and never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonitoredEvent {
    /// Human readable label used in notification text.
    pub label: String,

    /// Canonical public page of the event.
    pub page_url: Url,

    /// Landing page of the ticketing site, visited to warm up a session.
    pub site_root: Url,

    /// Base of the JSON event endpoint, e.g. `https://site.example/api/events`.
    pub api_base: Url,

    /// Numeric identifier of the event in the site's API.
    pub event_id: u64,

    /// How resale availability is recognised in fetched payloads.
    #[serde(default)]
    pub detection: DetectionConfig,
}

impl MonitoredEvent {
    /// URL of the JSON document describing this event.
    pub fn api_url(&self) -> Result<Url, url::ParseError> {
        let base = self.api_base.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/{}", self.event_id))
    }
}
