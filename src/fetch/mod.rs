//! # Fetch Strategy Chain
//!
//! Retrieves the current ticket state of the monitored event from a site that
//! actively rejects automated traffic.
//!
//! ## Core Components
//!
//! - **`StrategyConfig`**: a declarative description of one retrieval attempt
//!   (disguise profile, referrer, warm-up pages, target, pacing).
//! - **`DisguiseProfile`**: turns a profile kind into concrete request headers.
//! - **`Pacer`**: randomized, scalable pauses between requests.
//! - **`FetchChain`**: the single driver loop that runs the strategies in
//!   priority order against one cookie session.
//!
//! ## Workflow
//!
//! 1. A fresh `HttpSession` is built for the call and dropped when it returns.
//! 2. Each strategy pauses, visits its warm-up pages (each becoming the
//!    referrer of the next request), then issues its terminal request.
//! 3. The first terminal request answered with HTTP 200 ends the chain.
//! 4. Any other outcome is recorded and the next strategy runs. Blocks and
//!    transport errors also discard the session before moving on.
//! 5. When no strategy succeeds the chain returns `FetchError::Exhausted`,
//!    which callers treat as "no data this cycle".

use reqwest::{StatusCode, header::CONTENT_TYPE};
use serde::Serialize;
use url::Url;

use crate::{
    config::{BaseHttpClientConfig, FetchConfig},
    http_client::HttpSession,
    models::{MonitoredEvent, Payload},
};

pub mod error;
mod pacing;
mod profile;
pub mod strategy;

pub use error::{FetchAttempt, FetchError};
pub use pacing::Pacer;
pub use profile::DisguiseProfile;
pub use strategy::{
    DelayRange, ProfileKind, Referrer, StrategyConfig, Target, WarmUp, default_strategies,
};

/// A payload retrieved by one of the strategies.
#[derive(Debug, Clone, Serialize)]
pub struct FetchSuccess {
    /// The classified body of the terminal response.
    #[serde(skip)]
    pub payload: Payload,
    /// Name of the strategy that succeeded.
    pub strategy: String,
    /// Every strategy run, the successful one last.
    pub attempts: Vec<FetchAttempt>,
}

/// Runs the configured strategies in order until one of them gets a 200.
#[derive(Debug, Clone)]
pub struct FetchChain {
    strategies: Vec<StrategyConfig>,
    http: BaseHttpClientConfig,
    pacer: Pacer,
}

impl FetchChain {
    /// Creates a chain from an explicit strategy list.
    pub fn new(strategies: Vec<StrategyConfig>, http: BaseHttpClientConfig, pacer: Pacer) -> Self {
        Self { strategies, http, pacer }
    }

    /// Creates a chain from the fetch section of the application config.
    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(config.strategies.clone(), config.http.clone(), Pacer::new(config.pacing_factor))
    }

    /// The strategies in the order they are tried.
    pub fn strategies(&self) -> &[StrategyConfig] {
        &self.strategies
    }

    fn new_session(&self) -> Result<HttpSession, FetchError> {
        HttpSession::new(&self.http).map_err(|e| FetchError::SessionBuild(e.to_string()))
    }

    /// Retrieves the event's ticket state.
    #[tracing::instrument(skip_all, fields(event = %event.label))]
    pub async fn fetch(&self, event: &MonitoredEvent) -> Result<FetchSuccess, FetchError> {
        let api_url = event.api_url()?;
        let mut session = self.new_session()?;
        let mut attempts = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            if strategy.fresh_session && session.requests_made() > 0 {
                tracing::debug!(strategy = %strategy.name, "Starting strategy from a fresh session.");
                session = renew(session)?;
            }

            let delay = self.pacer.pause(&strategy.delay).await;
            let delay_ms = delay.as_millis() as u64;

            match self.run_strategy(&mut session, strategy, event, &api_url).await {
                Ok((status, payload)) => {
                    tracing::info!(
                        strategy = %strategy.name,
                        status,
                        shape = ?payload.shape(),
                        "Fetch strategy succeeded."
                    );
                    attempts.push(FetchAttempt {
                        strategy: strategy.name.clone(),
                        delay_ms,
                        status: Some(status),
                        error: None,
                    });
                    return Ok(FetchSuccess { payload, strategy: strategy.name.clone(), attempts });
                }
                Err(e) => {
                    tracing::warn!(
                        strategy = %strategy.name,
                        error = %e,
                        "Fetch strategy failed, advancing to the next one."
                    );
                    attempts.push(FetchAttempt {
                        strategy: strategy.name.clone(),
                        delay_ms,
                        status: e.status(),
                        error: Some(e.to_string()),
                    });
                    if e.is_suspicious() {
                        session = renew(session)?;
                    }
                }
            }
        }

        tracing::warn!(attempted = attempts.len(), "All fetch strategies exhausted.");
        Err(FetchError::Exhausted { attempts })
    }

    async fn run_strategy(
        &self,
        session: &mut HttpSession,
        strategy: &StrategyConfig,
        event: &MonitoredEvent,
        api_url: &Url,
    ) -> Result<(u16, Payload), FetchError> {
        let profile = DisguiseProfile::pick(strategy.profile, &mut rand::thread_rng());
        let mut referrer = strategy.referrer.resolve(event);

        for step in &strategy.warm_up {
            let url = step.url(event);
            match session.get(&url, profile.document_headers(&url, referrer.as_deref())).await {
                Ok(response) if response.status() == StatusCode::OK => {
                    tracing::debug!(strategy = %strategy.name, %url, "Warm-up page visited.");
                    referrer = Some(url.to_string());
                }
                Ok(response) => {
                    tracing::warn!(
                        strategy = %strategy.name,
                        %url,
                        status = response.status().as_u16(),
                        "Warm-up page did not return 200, requesting the target anyway."
                    );
                }
                Err(e) => {
                    tracing::warn!(strategy = %strategy.name, %url, error = %e, "Warm-up request failed.");
                }
            }
            self.pacer.pause(&strategy.step_delay).await;
        }

        let url = match strategy.target {
            Target::Page => event.page_url.clone(),
            Target::Api => api_url.clone(),
        };
        let response = session.get(&url, profile.headers(strategy.target, &url, referrer.as_deref())).await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::from_status(status));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;

        Ok((
            status.as_u16(),
            Payload::classify(strategy.target.expected_shape(), content_type.as_deref(), body),
        ))
    }
}

fn renew(session: HttpSession) -> Result<HttpSession, FetchError> {
    session.renew().map_err(|e| FetchError::SessionBuild(e.to_string()))
}
