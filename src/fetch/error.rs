//! Error types for the fetch strategy chain.

use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// The record of one strategy run, kept for logs and reports.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FetchAttempt {
    /// Name of the strategy.
    pub strategy: String,
    /// Pacing delay applied before the strategy, in milliseconds.
    pub delay_ms: u64,
    /// HTTP status of the terminal request, when one was received.
    pub status: Option<u16>,
    /// Why the strategy failed, if it did.
    pub error: Option<String>,
}

/// Errors produced while retrieving the event state.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP session could not be constructed at all.
    #[error("Failed to build HTTP session: {0}")]
    SessionBuild(String),

    /// The configured event URLs do not form a valid request URL.
    #[error("Invalid event URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Timeout, connection reset or another transport level failure.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The site rejected the request as automated traffic.
    #[error("Blocked by the site with HTTP {status}")]
    Blocked {
        /// The rejecting status code.
        status: u16,
    },

    /// Any other non-200 answer.
    #[error("Unexpected HTTP status {status}")]
    UnexpectedStatus {
        /// The status code received.
        status: u16,
    },

    /// Every configured strategy failed.
    #[error("All {} fetch strategies failed", .attempts.len())]
    Exhausted {
        /// One record per strategy, in the order they ran.
        attempts: Vec<FetchAttempt>,
    },
}

impl FetchError {
    /// Maps a non-200 status to the matching error.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
                FetchError::Blocked { status: status.as_u16() }
            }
            other => FetchError::UnexpectedStatus { status: other.as_u16() },
        }
    }

    /// True when the failure hints that the session itself is flagged, so the
    /// next strategy should not reuse its cookies.
    pub fn is_suspicious(&self) -> bool {
        matches!(self, FetchError::Blocked { .. } | FetchError::Transport(_))
    }

    /// True when no strategy could ever succeed, e.g. the session cannot be
    /// built. Everything else only means "no data this cycle".
    pub fn is_fatal(&self) -> bool {
        matches!(self, FetchError::SessionBuild(_) | FetchError::InvalidUrl(_))
    }

    /// The HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Blocked { status } | FetchError::UnexpectedStatus { status } => {
                Some(*status)
            }
            _ => None,
        }
    }
}
