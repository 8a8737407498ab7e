//! # Availability Evaluator
//!
//! Decides from a fetched payload whether resale tickets are offered.
//!
//! JSON documents go through structured extraction of the watched collection.
//! HTML pages are scanned for resale markers first; when none are found, any
//! event document embedded in the page is evaluated the structured way.
//!
//! Evaluation never fails. Malformed payloads and schema drift produce a
//! negative result whose details explain what went wrong, and a "sold out"
//! message on the page is reported without affecting the verdict.

mod error;
mod markup;
mod structured;

pub use error::EvaluationError;
pub use markup::{MarkupScanner, mentions_sold_out};
pub use structured::{Extraction, extract_snapshot};

use serde_json::Value;

use crate::models::{DetectionConfig, Payload, ResaleResult};

/// Turns payloads into [`ResaleResult`]s for one configured event.
#[derive(Debug, Clone)]
pub struct AvailabilityEvaluator {
    detection: DetectionConfig,
    scanner: MarkupScanner,
}

impl AvailabilityEvaluator {
    /// Creates an evaluator for the given detection markers.
    pub fn new(detection: DetectionConfig) -> Result<Self, EvaluationError> {
        let scanner = MarkupScanner::new(&detection)?;
        Ok(Self { detection, scanner })
    }

    /// The markers this evaluator looks for.
    pub fn detection(&self) -> &DetectionConfig {
        &self.detection
    }

    /// Evaluates a payload.
    pub fn evaluate(&self, payload: &Payload) -> ResaleResult {
        let result = match payload {
            Payload::Json(document) => self.evaluate_document(document),
            Payload::Html(body) => self.evaluate_markup(body),
        };
        tracing::debug!(
            available = result.available,
            matched = result.matched_count,
            details = ?result.details,
            "Payload evaluated."
        );
        result
    }

    fn evaluate_document(&self, document: &Value) -> ResaleResult {
        let extraction = match extract_snapshot(document, &self.detection.collection_name) {
            Ok(extraction) => extraction,
            Err(EvaluationError::CollectionMissing { wanted, present }) => {
                tracing::warn!(
                    wanted = %wanted,
                    present = ?present,
                    "Watched collection not found in event document."
                );
                return ResaleResult {
                    details: vec![format!(
                        "collection '{wanted}' not found; present collections: {present:?}"
                    )],
                    ..Default::default()
                };
            }
            Err(e) if e.is_schema_drift() => {
                tracing::warn!(error = %e, "Event document changed shape.");
                return ResaleResult::unavailable_with_error(e);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Event document could not be evaluated.");
                return ResaleResult::unavailable_with_error(e);
            }
        };

        let sentinel = &self.detection.available_resale_state;
        let matched: Vec<&str> = extraction
            .snapshot
            .resale_available(sentinel)
            .map(|item| item.id.as_str())
            .collect();

        let mut details = Vec::new();
        if matched.is_empty() {
            details.push(format!(
                "no item in '{}' has resale state {sentinel}",
                extraction.snapshot.name
            ));
        } else {
            details.push(format!("resale available for sale ids: {}", matched.join(", ")));
        }
        if !extraction.unresolved.is_empty() {
            details.push(format!(
                "sale ids without a sale record: {}",
                extraction.unresolved.join(", ")
            ));
        }

        ResaleResult {
            available: !matched.is_empty(),
            matched_count: matched.len(),
            details,
            snapshot: Some(extraction.snapshot),
        }
    }

    fn evaluate_markup(&self, body: &str) -> ResaleResult {
        let markers = match self.scanner.count_markers(body) {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, "Page could not be evaluated.");
                return ResaleResult::unavailable_with_error(e);
            }
        };

        let mut details = Vec::new();
        if mentions_sold_out(body) {
            details.push("page shows a 'sold out' message (not used as a signal)".to_string());
        }

        if markers > 0 {
            details.insert(
                0,
                format!(
                    "{markers} element(s) with {}=\"{}\"",
                    self.detection.markup_attribute, self.detection.markup_value
                ),
            );
            return ResaleResult { available: true, matched_count: markers, details, snapshot: None };
        }

        for document in self.scanner.embedded_documents(body) {
            if !structured::looks_like_event_document(&document) {
                continue;
            }
            let mut embedded = self.evaluate_document(&document);
            embedded.details.insert(0, "evaluated event document embedded in page".to_string());
            embedded.details.extend(details);
            return embedded;
        }

        details.insert(0, "no resale markers found in page".to_string());
        ResaleResult { details, ..Default::default() }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn evaluator() -> AvailabilityEvaluator {
        AvailabilityEvaluator::new(DetectionConfig::default()).unwrap()
    }

    fn document(resale_states: &[&str]) -> Value {
        let sales: Vec<Value> = resale_states
            .iter()
            .enumerate()
            .map(|(i, state)| json!({"id": i + 1, "state": "SOLD_OUT", "resaleState": state}))
            .collect();
        let ids: Vec<usize> = (1..=resale_states.len()).collect();
        json!({
            "collectionConfiguration": {
                "collections": [{"name": "Festival Passes", "id": 1, "sales": ids}]
            },
            "sales": sales
        })
    }

    #[test]
    fn test_json_with_available_item() {
        let result = evaluator().evaluate(&Payload::Json(document(&["NONE", "AVAILABLE"])));
        assert!(result.available);
        assert_eq!(result.matched_count, 1);
        assert_eq!(result.details[0], "resale available for sale ids: 2");
        assert_eq!(result.snapshot.unwrap().items.len(), 2);
    }

    #[test]
    fn test_json_without_available_item() {
        let result = evaluator().evaluate(&Payload::Json(document(&["NONE", "available"])));
        assert!(!result.available);
        assert_eq!(result.matched_count, 0);
        assert!(!result.has_error());
    }

    #[test]
    fn test_json_missing_collection_is_negative_not_error() {
        let doc = json!({
            "collectionConfiguration": {"collections": [{"name": "VIP Passes", "sales": []}]},
            "sales": []
        });
        let result = evaluator().evaluate(&Payload::Json(doc));
        assert!(!result.available);
        assert!(!result.has_error());
        assert!(result.details[0].contains("VIP Passes"));
    }

    #[test]
    fn test_malformed_json_is_negative_with_error() {
        let result = evaluator().evaluate(&Payload::Json(json!("just a string")));
        assert!(!result.available);
        assert!(result.has_error());
    }

    #[test]
    fn test_repeated_sale_ids_do_not_inflate_matches() {
        let doc = json!({
            "collectionConfiguration": {
                "collections": [{"name": "Festival Passes", "sales": [1, 1, {"id": 1}]}]
            },
            "sales": [{"id": 1, "resaleState": "AVAILABLE"}]
        });
        let result = evaluator().evaluate(&Payload::Json(doc));
        assert!(result.available);
        assert_eq!(result.matched_count, 1);
    }

    #[test]
    fn test_document_without_configuration_is_error() {
        let result = evaluator().evaluate(&Payload::Json(json!({"sales": []})));
        assert!(!result.available);
        assert!(result.has_error());
        assert!(result.details[0].contains("collectionConfiguration"));
    }

    #[test]
    fn test_html_with_markers() {
        let body = r#"<div state="RESALE"></div><div state="RESALE"></div><p>Sold out</p>"#;
        let result = evaluator().evaluate(&Payload::Html(body.to_string()));
        assert!(result.available);
        assert_eq!(result.matched_count, 2);
        assert_eq!(result.details.len(), 2);
    }

    #[test]
    fn test_sold_out_text_alone_is_not_availability() {
        let body = "<html><body><h1>Sold out</h1></body></html>";
        let result = evaluator().evaluate(&Payload::Html(body.to_string()));
        assert!(!result.available);
        assert!(result.details.iter().any(|d| d.contains("sold out")));
    }

    #[test]
    fn test_html_falls_back_to_embedded_document() {
        let body = format!(
            r#"<html><script type="application/json">{}</script></html>"#,
            document(&["AVAILABLE"])
        );
        let result = evaluator().evaluate(&Payload::Html(body));
        assert!(result.available);
        assert_eq!(result.matched_count, 1);
        assert_eq!(result.details[0], "evaluated event document embedded in page");
    }

    #[test]
    fn test_non_markup_html_payload_is_error() {
        let result = evaluator().evaluate(&Payload::Html("Access denied".to_string()));
        assert!(!result.available);
        assert!(result.has_error());
    }
}
