use serde::Deserialize;

use super::BaseHttpClientConfig;
use crate::fetch::{StrategyConfig, default_strategies};

fn default_pacing_factor() -> f64 {
    1.0
}

/// Configuration of the fetch strategy chain.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FetchConfig {
    /// Strategies in priority order. Defaults to the built-in list.
    #[serde(default = "default_strategies")]
    pub strategies: Vec<StrategyConfig>,

    /// Multiplier applied to every pacing delay; `0` disables pacing.
    #[serde(default = "default_pacing_factor")]
    pub pacing_factor: f64,

    /// Settings of the session used against the ticketing site.
    #[serde(default)]
    pub http: BaseHttpClientConfig,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            strategies: default_strategies(),
            pacing_factor: default_pacing_factor(),
            http: BaseHttpClientConfig::default(),
        }
    }
}
