//! Declarative descriptions of fetch strategies.
//!
//! A strategy is pure data: which disguise to wear, where the request should
//! appear to come from, which pages to visit first and what to finally ask
//! for. The driver in [`super::FetchChain`] interprets the list in order.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::{MonitoredEvent, PayloadShape};

/// Search engine results page used as the referrer for "organic" arrivals.
const SEARCH_ENGINE_REFERRER: &str = "https://www.google.com/";

/// The header set a strategy presents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    /// A full desktop browser header set with a rotated user agent.
    Browser,
    /// Only a generic, honest user agent.
    Minimal,
    /// No custom headers at all.
    Bare,
}

/// Where the request claims to come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Referrer {
    /// A direct visit, no `Referer` header.
    None,
    /// Arrival from a search engine result.
    SearchEngine,
    /// Navigation from the ticketing site's own landing page.
    Site,
    /// Arrival from an arbitrary external page.
    External(Url),
}

impl Referrer {
    /// The `Referer` header value for this referrer, if any.
    pub fn resolve(&self, event: &MonitoredEvent) -> Option<String> {
        match self {
            Referrer::None => None,
            Referrer::SearchEngine => Some(SEARCH_ENGINE_REFERRER.to_string()),
            Referrer::Site => Some(event.site_root.to_string()),
            Referrer::External(url) => Some(url.to_string()),
        }
    }
}

/// A page visited before the real request to pick up session cookies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WarmUp {
    /// The site's landing page.
    SiteRoot,
    /// Any other page, e.g. the organiser's group page.
    Page(Url),
}

impl WarmUp {
    /// The URL this step visits.
    pub fn url(&self, event: &MonitoredEvent) -> Url {
        match self {
            WarmUp::SiteRoot => event.site_root.clone(),
            WarmUp::Page(url) => url.clone(),
        }
    }
}

/// What the terminal request asks for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// The public event page.
    Page,
    /// The JSON event endpoint.
    Api,
}

impl Target {
    /// The payload shape this target is expected to answer with.
    pub fn expected_shape(self) -> PayloadShape {
        match self {
            Target::Page => PayloadShape::Html,
            Target::Api => PayloadShape::Json,
        }
    }
}

/// An inclusive range of milliseconds a randomized delay is drawn from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DelayRange {
    /// Lower bound in milliseconds.
    pub min_ms: u64,
    /// Upper bound in milliseconds.
    pub max_ms: u64,
}

impl DelayRange {
    /// A range from `min_ms` to `max_ms` milliseconds.
    pub const fn millis(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// No delay.
    pub const fn none() -> Self {
        Self { min_ms: 0, max_ms: 0 }
    }

    /// Draws a duration from the range. A reversed range collapses to its
    /// lower bound.
    pub fn sample<R: rand::Rng>(&self, rng: &mut R) -> Duration {
        if self.max_ms <= self.min_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rng.gen_range(self.min_ms..=self.max_ms))
    }
}

fn default_step_delay() -> DelayRange {
    DelayRange::millis(1_000, 3_000)
}

/// One retrieval strategy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StrategyConfig {
    /// Name used in logs and reports.
    pub name: String,
    /// Header set to present.
    pub profile: ProfileKind,
    /// Referrer of the first request of the strategy.
    #[serde(default = "default_referrer")]
    pub referrer: Referrer,
    /// Pages visited before the terminal request, in order.
    #[serde(default)]
    pub warm_up: Vec<WarmUp>,
    /// The terminal request.
    pub target: Target,
    /// Delay applied before the first request of the strategy.
    #[serde(default)]
    pub delay: DelayRange,
    /// Delay applied between the steps of the strategy.
    #[serde(default = "default_step_delay")]
    pub step_delay: DelayRange,
    /// Start from a fresh cookie session instead of reusing the current one.
    #[serde(default)]
    pub fresh_session: bool,
}

fn default_referrer() -> Referrer {
    Referrer::None
}

/// The built-in strategy order, from the most browser-like to the most
/// minimal.
pub fn default_strategies() -> Vec<StrategyConfig> {
    vec![
        StrategyConfig {
            name: "api-after-home-visit".to_string(),
            profile: ProfileKind::Browser,
            referrer: Referrer::SearchEngine,
            warm_up: vec![WarmUp::SiteRoot],
            target: Target::Api,
            delay: DelayRange::millis(3_000, 8_000),
            step_delay: DelayRange::millis(500, 2_000),
            fresh_session: false,
        },
        StrategyConfig {
            name: "page-from-site".to_string(),
            profile: ProfileKind::Browser,
            referrer: Referrer::Site,
            warm_up: Vec::new(),
            target: Target::Page,
            delay: DelayRange::millis(1_000, 3_000),
            step_delay: default_step_delay(),
            fresh_session: false,
        },
        StrategyConfig {
            name: "page-fresh-search-referrer".to_string(),
            profile: ProfileKind::Browser,
            referrer: Referrer::SearchEngine,
            warm_up: Vec::new(),
            target: Target::Page,
            delay: DelayRange::millis(5_000, 10_000),
            step_delay: default_step_delay(),
            fresh_session: true,
        },
        StrategyConfig {
            name: "page-organic-navigation".to_string(),
            profile: ProfileKind::Browser,
            referrer: Referrer::Site,
            warm_up: vec![WarmUp::SiteRoot],
            target: Target::Page,
            delay: DelayRange::millis(15_000, 30_000),
            step_delay: default_step_delay(),
            fresh_session: true,
        },
        StrategyConfig {
            name: "page-minimal-headers".to_string(),
            profile: ProfileKind::Minimal,
            referrer: Referrer::None,
            warm_up: Vec::new(),
            target: Target::Page,
            delay: DelayRange::none(),
            step_delay: DelayRange::none(),
            fresh_session: false,
        },
        StrategyConfig {
            name: "page-bare-client".to_string(),
            profile: ProfileKind::Bare,
            referrer: Referrer::None,
            warm_up: Vec::new(),
            target: Target::Page,
            delay: DelayRange::none(),
            step_delay: DelayRange::none(),
            fresh_session: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::test_helpers::test_event;

    #[test]
    fn test_default_order_starts_realistic_and_ends_minimal() {
        let strategies = default_strategies();
        assert_eq!(strategies.first().unwrap().profile, ProfileKind::Browser);
        assert_eq!(strategies.last().unwrap().profile, ProfileKind::Bare);
        let names: std::collections::HashSet<_> = strategies.iter().map(|s| &s.name).collect();
        assert_eq!(names.len(), strategies.len(), "strategy names must be unique");
    }

    #[test]
    fn test_delay_sample_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let range = DelayRange::millis(100, 200);
        for _ in 0..100 {
            let d = range.sample(&mut rng);
            assert!(d >= Duration::from_millis(100) && d <= Duration::from_millis(200));
        }
        assert_eq!(DelayRange::millis(50, 10).sample(&mut rng), Duration::from_millis(50));
        assert_eq!(DelayRange::none().sample(&mut rng), Duration::ZERO);
    }

    #[test]
    fn test_referrer_resolution() {
        let event = test_event("https://tickets.example");
        assert_eq!(Referrer::None.resolve(&event), None);
        assert_eq!(Referrer::Site.resolve(&event).as_deref(), Some("https://tickets.example/"));
        assert!(Referrer::SearchEngine.resolve(&event).unwrap().contains("google"));
    }

    #[test]
    fn test_strategy_deserializes_with_defaults() {
        let json = r#"{"name": "only-page", "profile": "minimal", "target": "page"}"#;
        let strategy: StrategyConfig = serde_json::from_str(json).unwrap();
        assert_eq!(strategy.referrer, Referrer::None);
        assert!(strategy.warm_up.is_empty());
        assert_eq!(strategy.delay, DelayRange::none());
        assert!(!strategy.fresh_session);
    }
}
