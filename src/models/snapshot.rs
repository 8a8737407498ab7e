//! The parsed view of the watched collection.

use serde::Serialize;

/// One purchasable ticket type as reported by the site.
///
/// Both states are free-form values from the source. Missing values stay
/// `None`; unknown values are kept verbatim.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SaleItem {
    /// Identifier of the sale, normalised to a string.
    pub id: String,
    /// Primary market state, e.g. `ON_SALE` or `SOLD_OUT`.
    pub state: Option<String>,
    /// Resale market state, e.g. `AVAILABLE` or `NONE`.
    pub resale_state: Option<String>,
}

/// A named collection and its sale items, in the order the collection lists
/// them. Built fresh from every payload.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TicketCollectionSnapshot {
    /// The collection name as found in the payload.
    pub name: String,
    /// Sale items referenced by the collection.
    pub items: Vec<SaleItem>,
}

impl TicketCollectionSnapshot {
    /// Items whose resale state equals `sentinel` exactly.
    pub fn resale_available<'a>(&'a self, sentinel: &'a str) -> impl Iterator<Item = &'a SaleItem> {
        self.items.iter().filter(move |item| item.resale_state.as_deref() == Some(sentinel))
    }
}
