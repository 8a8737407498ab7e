//! Payloads returned by the ticketing site.

use serde::Serialize;

/// The representation a fetch target is expected to answer with.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PayloadShape {
    /// An HTML document.
    Html,
    /// A JSON API document.
    Json,
}

/// A successfully fetched body, tagged by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Raw HTML markup.
    Html(String),
    /// A parsed JSON document.
    Json(serde_json::Value),
}

impl Payload {
    /// Builds a payload from a response body.
    ///
    /// The body is parsed as JSON when the target was expected to answer with
    /// JSON or the response declares a JSON content type. A body that fails to
    /// parse is kept as markup so the evaluator can still inspect it.
    pub fn classify(expected: PayloadShape, content_type: Option<&str>, body: String) -> Self {
        let declares_json = content_type.is_some_and(|ct| ct.contains("json"));
        if expected == PayloadShape::Json || declares_json {
            match serde_json::from_str(&body) {
                Ok(value) => return Payload::Json(value),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        content_type = content_type.unwrap_or("<none>"),
                        "Expected a JSON body but it did not parse; inspecting it as markup."
                    );
                }
            }
        }
        Payload::Html(body)
    }

    /// The shape of this payload.
    pub fn shape(&self) -> PayloadShape {
        match self {
            Payload::Html(_) => PayloadShape::Html,
            Payload::Json(_) => PayloadShape::Json,
        }
    }
}
