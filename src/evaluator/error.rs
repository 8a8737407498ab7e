//! Error types for payload evaluation.

use thiserror::Error;

/// Reasons a payload could not be evaluated.
///
/// None of these ever reach the caller of the evaluator; they are folded into
/// a negative `ResaleResult` with a detail line.
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// The document has no collection with the watched name.
    #[error("collection '{wanted}' not found, present collections: {present:?}")]
    CollectionMissing {
        /// The collection name that was looked for.
        wanted: String,
        /// Names of the collections the document does contain.
        present: Vec<String>,
    },

    /// A structural field the extraction relies on is absent.
    #[error("field '{0}' missing from event document")]
    MissingField(&'static str),

    /// The JSON document does not have the expected structure at all.
    #[error("malformed event document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// An HTML payload that contains no markup.
    #[error("payload does not look like an HTML document")]
    NotMarkup,

    /// The configured marker could not be compiled into a pattern.
    #[error("invalid markup marker pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl EvaluationError {
    /// True for upstream schema changes, as opposed to broken payloads.
    pub fn is_schema_drift(&self) -> bool {
        matches!(self, EvaluationError::CollectionMissing { .. } | EvaluationError::MissingField(_))
    }
}
