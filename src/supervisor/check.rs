//! Fetching and evaluating the event, shared by full cycles and `check`.

use serde::Serialize;

use super::SupervisorError;
use crate::{
    config::AppConfig,
    evaluator::AvailabilityEvaluator,
    fetch::{FetchAttempt, FetchChain, FetchError},
    models::{MonitoredEvent, ResaleResult},
};

/// Result of fetching and evaluating the event once.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    /// Name of the strategy that produced the payload.
    pub strategy: Option<String>,
    /// Every fetch attempt of the cycle.
    pub attempts: Vec<FetchAttempt>,
    /// The verdict, absent when no payload could be fetched.
    pub result: Option<ResaleResult>,
}

impl CheckOutcome {
    /// True when resale tickets were detected.
    pub fn available(&self) -> bool {
        self.result.as_ref().is_some_and(|r| r.available)
    }
}

/// The fetch chain and evaluator for the monitored event.
pub struct EventCheck {
    event: MonitoredEvent,
    chain: FetchChain,
    evaluator: AvailabilityEvaluator,
}

impl EventCheck {
    /// Creates a check from explicit parts.
    pub fn new(event: MonitoredEvent, chain: FetchChain, evaluator: AvailabilityEvaluator) -> Self {
        Self { event, chain, evaluator }
    }

    /// Creates a check from the application configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, SupervisorError> {
        config
            .event
            .api_url()
            .map_err(|e| SupervisorError::InvalidConfiguration(format!("event API URL: {e}")))?;
        if config.fetch.strategies.is_empty() {
            return Err(SupervisorError::InvalidConfiguration(
                "at least one fetch strategy is required".into(),
            ));
        }
        let evaluator = AvailabilityEvaluator::new(config.event.detection.clone())?;
        Ok(Self::new(config.event.clone(), FetchChain::from_config(&config.fetch), evaluator))
    }

    /// The monitored event.
    pub fn event(&self) -> &MonitoredEvent {
        &self.event
    }

    /// The fetch chain.
    pub fn chain(&self) -> &FetchChain {
        &self.chain
    }

    /// Fetches and evaluates the event.
    ///
    /// An exhausted chain is not an error: the outcome simply carries no
    /// result. Only setup faults that would fail every cycle are returned.
    #[tracing::instrument(skip(self), fields(event = %self.event.label))]
    pub async fn run(&self) -> Result<CheckOutcome, SupervisorError> {
        match self.chain.fetch(&self.event).await {
            Ok(success) => {
                let result = self.evaluator.evaluate(&success.payload);
                tracing::info!(
                    strategy = %success.strategy,
                    available = result.available,
                    matched = result.matched_count,
                    "Event evaluated."
                );
                Ok(CheckOutcome {
                    strategy: Some(success.strategy),
                    attempts: success.attempts,
                    result: Some(result),
                })
            }
            Err(FetchError::Exhausted { attempts }) => {
                tracing::warn!(
                    attempts = attempts.len(),
                    "No strategy could fetch the event, nothing to evaluate this cycle."
                );
                Ok(CheckOutcome { strategy: None, attempts, result: None })
            }
            Err(e) if e.is_fatal() => Err(e.into()),
            Err(e) => {
                tracing::warn!(error = %e, "Fetch failed, nothing to evaluate this cycle.");
                Ok(CheckOutcome { strategy: None, attempts: Vec::new(), result: None })
            }
        }
    }
}
