//! Structured extraction from the JSON event document.
//!
//! Expected layout:
//!
//! ```json
//! {
//!   "collectionConfiguration": {
//!     "collections": [{ "name": "Festival Passes", "id": 7, "sales": [1, {"id": 2}] }]
//!   },
//!   "sales": [{ "id": 1, "state": "ON_SALE", "resaleState": "AVAILABLE" }]
//! }
//! ```
//!
//! Individual list entries that do not fit the layout are skipped rather than
//! failing the whole document.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

use super::error::EvaluationError;
use crate::models::{SaleItem, TicketCollectionSnapshot};

/// Sale identifiers appear as numbers or strings; both normalise to a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SaleId(String);

impl<'de> Deserialize<'de> for SaleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(SaleId(s)),
            Value::Number(n) => Ok(SaleId(n.to_string())),
            other => Err(serde::de::Error::custom(format!("unsupported sale id: {other}"))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SaleRef {
    Bare(SaleId),
    Object { id: SaleId },
}

impl SaleRef {
    fn id(&self) -> &SaleId {
        match self {
            SaleRef::Bare(id) | SaleRef::Object { id } => id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Collection {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    sales: Vec<SaleRef>,
}

#[derive(Debug, Deserialize)]
struct CollectionConfiguration {
    #[serde(default, deserialize_with = "lenient_list")]
    collections: Vec<Collection>,
}

#[derive(Debug, Deserialize)]
struct SaleRecord {
    id: SaleId,
    #[serde(default)]
    state: Option<String>,
    #[serde(default, rename = "resaleState")]
    resale_state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventDocument {
    #[serde(default, rename = "collectionConfiguration")]
    collection_configuration: Option<CollectionConfiguration>,
    #[serde(default, deserialize_with = "lenient_list")]
    sales: Vec<SaleRecord>,
}

/// Deserializes a list, dropping entries that do not match `T`. A `null`
/// list is empty.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    let total = raw.len();
    let parsed: Vec<T> = raw.into_iter().filter_map(|v| serde_json::from_value(v).ok()).collect();
    if parsed.len() != total {
        tracing::debug!(skipped = total - parsed.len(), "Skipped malformed list entries.");
    }
    Ok(parsed)
}

/// What structured extraction found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// The watched collection with its sale items resolved.
    pub snapshot: TicketCollectionSnapshot,
    /// Sale ids listed by the collection that have no sale record.
    pub unresolved: Vec<String>,
}

/// True when the value looks like an event document.
pub fn looks_like_event_document(value: &Value) -> bool {
    value.get("collectionConfiguration").is_some()
}

/// Builds the snapshot of `collection_name` from an event document.
pub fn extract_snapshot(document: &Value, collection_name: &str) -> Result<Extraction, EvaluationError> {
    let document = EventDocument::deserialize(document)?;

    let configuration = document
        .collection_configuration
        .ok_or(EvaluationError::MissingField("collectionConfiguration"))?;

    let Some(collection) = configuration
        .collections
        .iter()
        .find(|c| c.name.as_deref() == Some(collection_name))
    else {
        return Err(EvaluationError::CollectionMissing {
            wanted: collection_name.to_string(),
            present: configuration.collections.iter().filter_map(|c| c.name.clone()).collect(),
        });
    };

    let records: HashMap<&SaleId, &SaleRecord> =
        document.sales.iter().map(|record| (&record.id, record)).collect();

    let mut items = Vec::with_capacity(collection.sales.len());
    let mut unresolved = Vec::new();
    let mut seen: HashSet<&SaleId> = HashSet::new();
    for sale in &collection.sales {
        let id = sale.id();
        if !seen.insert(id) {
            continue;
        }
        match records.get(id) {
            Some(record) => items.push(SaleItem {
                id: id.0.clone(),
                state: record.state.clone(),
                resale_state: record.resale_state.clone(),
            }),
            None => {
                unresolved.push(id.0.clone());
                items.push(SaleItem { id: id.0.clone(), state: None, resale_state: None });
            }
        }
    }

    Ok(Extraction {
        snapshot: TicketCollectionSnapshot { name: collection_name.to_string(), items },
        unresolved,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_extracts_collection_in_listed_order() {
        let document = json!({
            "collectionConfiguration": {
                "collections": [
                    {"name": "Camping", "id": 1, "sales": [9]},
                    {"name": "Festival Passes", "id": 2, "sales": [{"id": 2}, 1]}
                ]
            },
            "sales": [
                {"id": 1, "state": "ON_SALE", "resaleState": "AVAILABLE"},
                {"id": 2, "state": "SOLD_OUT", "resaleState": "NONE"},
                {"id": 9, "state": "ON_SALE"}
            ]
        });

        let extraction = extract_snapshot(&document, "Festival Passes").unwrap();
        let ids: Vec<_> = extraction.snapshot.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(extraction.snapshot.items[1].resale_state.as_deref(), Some("AVAILABLE"));
        assert!(extraction.unresolved.is_empty());
    }

    #[test]
    fn test_string_and_numeric_ids_match() {
        let document = json!({
            "collectionConfiguration": {"collections": [{"name": "Festival Passes", "sales": ["5"]}]},
            "sales": [{"id": 5, "resaleState": "AVAILABLE"}]
        });
        let extraction = extract_snapshot(&document, "Festival Passes").unwrap();
        assert_eq!(extraction.snapshot.items[0].resale_state.as_deref(), Some("AVAILABLE"));
    }

    #[test]
    fn test_repeated_sale_ids_count_once() {
        let document = json!({
            "collectionConfiguration": {
                "collections": [{"name": "Festival Passes", "sales": [1, 2, 1, {"id": 1}, "2"]}]
            },
            "sales": [
                {"id": 1, "resaleState": "AVAILABLE"},
                {"id": 2, "resaleState": "NONE"}
            ]
        });
        let extraction = extract_snapshot(&document, "Festival Passes").unwrap();
        let ids: Vec<_> = extraction.snapshot.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(extraction.snapshot.resale_available("AVAILABLE").count(), 1);
    }

    #[test]
    fn test_missing_collection_reports_present_names() {
        let document = json!({
            "collectionConfiguration": {"collections": [{"name": "VIP"}, {"name": "Parking"}]},
            "sales": []
        });
        match extract_snapshot(&document, "Festival Passes") {
            Err(EvaluationError::CollectionMissing { wanted, present }) => {
                assert_eq!(wanted, "Festival Passes");
                assert_eq!(present, vec!["VIP", "Parking"]);
            }
            other => panic!("Expected CollectionMissing, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_configuration_is_schema_drift() {
        let err = extract_snapshot(&json!({"sales": []}), "Festival Passes").unwrap_err();
        assert!(matches!(err, EvaluationError::MissingField("collectionConfiguration")));
        assert!(err.is_schema_drift());
    }

    #[test]
    fn test_non_object_document_is_malformed() {
        let err = extract_snapshot(&json!([1, 2, 3]), "Festival Passes").unwrap_err();
        assert!(matches!(err, EvaluationError::Malformed(_)));
        assert!(!err.is_schema_drift());
    }

    #[test]
    fn test_malformed_entries_are_skipped_and_unknown_ids_kept() {
        let document = json!({
            "collectionConfiguration": {
                "collections": [{"name": "Festival Passes", "sales": [1, true, {"nope": 1}, 3]}]
            },
            "sales": [
                {"id": 1, "resaleState": "AVAILABLE"},
                {"state": "ON_SALE"},
                "garbage"
            ]
        });
        let extraction = extract_snapshot(&document, "Festival Passes").unwrap();
        assert_eq!(extraction.snapshot.items.len(), 2);
        assert_eq!(extraction.unresolved, vec!["3"]);
        assert_eq!(extraction.snapshot.items[1].resale_state, None);
    }
}
