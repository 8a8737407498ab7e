//! Pattern scanning over the public event page.

use regex::Regex;
use serde_json::Value;

use super::error::EvaluationError;
use crate::models::DetectionConfig;

/// Scans page markup for elements whose state attribute carries the resale
/// marker, e.g. `<div state="RESALE">`.
#[derive(Debug, Clone)]
pub struct MarkupScanner {
    marker: Regex,
    embedded_json: Regex,
}

impl MarkupScanner {
    /// Compiles the marker pattern for the configured attribute and value.
    ///
    /// The attribute name matches case-insensitively (HTML attributes are);
    /// the value must match exactly, quoted or unquoted.
    pub fn new(detection: &DetectionConfig) -> Result<Self, EvaluationError> {
        let attribute = regex::escape(&detection.markup_attribute);
        let value = regex::escape(&detection.markup_value);
        let marker = Regex::new(&format!(
            r#"<[A-Za-z][^>]*?\s(?i:{attribute})\s*=\s*(?:"{value}"|'{value}'|{value}[\s/>])"#
        ))?;
        let embedded_json = Regex::new(
            r#"(?is)<script[^>]*\stype\s*=\s*["']application/(?:ld\+)?json["'][^>]*>(.*?)</script>"#,
        )?;
        Ok(Self { marker, embedded_json })
    }

    /// Number of elements carrying the resale marker.
    pub fn count_markers(&self, body: &str) -> Result<usize, EvaluationError> {
        if !body.contains('<') {
            return Err(EvaluationError::NotMarkup);
        }
        Ok(self.marker.find_iter(body).count())
    }

    /// JSON documents embedded in `<script type="application/json">` blocks.
    /// Blocks that do not parse are ignored.
    pub fn embedded_documents(&self, body: &str) -> Vec<Value> {
        self.embedded_json
            .captures_iter(body)
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| serde_json::from_str(m.as_str().trim()).ok())
            .collect()
    }
}

/// True when the page shows a "sold out" message. This is reported but never
/// treated as evidence either way.
pub fn mentions_sold_out(body: &str) -> bool {
    body.to_lowercase().contains("sold out")
}
