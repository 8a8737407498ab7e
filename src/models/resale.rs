//! The outcome of inspecting one payload for resale inventory.

use serde::Serialize;

use super::snapshot::TicketCollectionSnapshot;

/// Whether resale tickets were detected, with enough context to explain why.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ResaleResult {
    /// True only when an explicit resale marker was found.
    pub available: bool,
    /// Number of sale items or page elements that matched.
    pub matched_count: usize,
    /// Human readable notes; failures are prefixed with `error:`.
    pub details: Vec<String>,
    /// The watched collection, when the payload was a JSON document that
    /// contained it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<TicketCollectionSnapshot>,
}

impl ResaleResult {
    /// A negative result carrying the reason it could not be evaluated.
    pub fn unavailable_with_error(error: impl std::fmt::Display) -> Self {
        Self { details: vec![format!("error: {error}")], ..Default::default() }
    }

    /// True when evaluation failed rather than simply finding nothing.
    pub fn has_error(&self) -> bool {
        self.details.iter().any(|d| d.starts_with("error:"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_with_error() {
        let result = ResaleResult::unavailable_with_error("boom");
        assert!(!result.available);
        assert_eq!(result.matched_count, 0);
        assert_eq!(result.details, vec!["error: boom"]);
        assert!(result.has_error());
        assert!(!ResaleResult::default().has_error());
    }
}
