//! The Supervisor owns every component of resale-watch and runs one cycle.
//!
//! ## Responsibilities
//!
//! - **Initialization**: The `SupervisorBuilder` constructs and wires the
//!   fetch chain, evaluator, subscriber registry, command processor and
//!   notification channels from the application configuration.
//! - **Cycle execution**: `run_cycle` processes pending chat commands, fetches
//!   the event, evaluates the payload and, on a positive detection, notifies
//!   every channel. The steps run strictly one after another.
//! - **Failure containment**: Only configuration faults and failures to build
//!   the HTTP session are returned as errors. A blocked site, a broken chat
//!   API or a failing recipient are logged and reported, and the cycle still
//!   completes.

mod builder;
mod check;

use std::sync::Arc;

pub use builder::SupervisorBuilder;
pub use check::{CheckOutcome, EventCheck};
use serde::Serialize;
use thiserror::Error;

use crate::{
    commands::{CommandProcessor, CommandReport},
    evaluator::EvaluationError,
    fetch::FetchError,
    http_client::HttpClientPoolError,
    models::{MonitoredEvent, NotificationEvent},
    notification::{DispatchSummary, NotificationDispatcher},
    persistence::{PersistenceError, SubscriberRegistry},
};

/// Represents the set of errors that can stop a cycle from running at all.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// A required configuration was not provided to the `SupervisorBuilder`.
    #[error("Missing configuration for Supervisor")]
    MissingConfig,

    /// An error occurred due to an invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The subscriber registry could not be opened.
    #[error("Failed to open subscriber registry: {0}")]
    Registry(#[from] PersistenceError),

    /// A provider HTTP client could not be created.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] HttpClientPoolError),

    /// The detection markers could not be compiled.
    #[error("Evaluator setup failed: {0}")]
    Evaluator(#[from] EvaluationError),

    /// Fetching can never succeed with the current setup.
    #[error("Fetch setup failed: {0}")]
    Fetch(#[from] FetchError),
}

/// Everything one cycle did.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    /// Command processing, absent when the chat channel is not configured or
    /// updates could not be fetched.
    pub commands: Option<CommandReport>,
    /// The fetch and evaluation outcome.
    pub check: CheckOutcome,
    /// Notification results, present only after a positive detection.
    pub dispatch: Option<DispatchSummary>,
}

/// The top-level owner of all components.
pub struct Supervisor {
    check: EventCheck,
    registry: Arc<dyn SubscriberRegistry>,
    commands: Option<CommandProcessor>,
    dispatcher: NotificationDispatcher,
}

impl Supervisor {
    /// Creates a new `SupervisorBuilder`.
    pub fn builder() -> SupervisorBuilder {
        SupervisorBuilder::new()
    }

    /// The monitored event.
    pub fn event(&self) -> &MonitoredEvent {
        self.check.event()
    }

    /// The notification dispatcher.
    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.dispatcher
    }

    /// Fetches and evaluates the event without touching subscribers.
    pub async fn check(&self) -> Result<CheckOutcome, SupervisorError> {
        self.check.run().await
    }

    /// Runs one full cycle: commands, fetch, evaluation and dispatch.
    #[tracing::instrument(skip(self), fields(event = %self.event().label))]
    pub async fn run_cycle(&self) -> Result<CycleReport, SupervisorError> {
        tracing::info!("Starting monitoring cycle.");

        let commands = match &self.commands {
            Some(processor) => match processor.process_pending().await {
                Ok(report) => Some(report),
                Err(e) => {
                    tracing::warn!(error = %e, "Could not fetch chat commands, skipping them this cycle.");
                    None
                }
            },
            None => None,
        };

        let check = self.check().await?;

        let dispatch = match &check.result {
            Some(result) if result.available => {
                let notification = NotificationEvent::from_detection(self.event(), result);
                tracing::info!(
                    tickets = notification.ticket_count,
                    "Resale tickets detected, notifying subscribers."
                );
                Some(self.dispatcher.dispatch(&notification).await)
            }
            _ => {
                tracing::info!("No resale tickets detected.");
                None
            }
        };

        tracing::info!("Monitoring cycle complete.");
        Ok(CycleReport { commands, check, dispatch })
    }
}
