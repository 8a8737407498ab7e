//! Ticketing site payloads.

use serde_json::{Value, json};

/// An event document whose "Festival Passes" collection lists one sale per
/// entry of `resale_states`, with ids starting at 1.
pub fn event_document(resale_states: &[&str]) -> Value {
    let sales: Vec<Value> = resale_states
        .iter()
        .enumerate()
        .map(|(i, state)| json!({ "id": i + 1, "state": "SOLD_OUT", "resaleState": state }))
        .collect();
    let refs: Vec<Value> = (1..=resale_states.len()).map(|id| json!({ "id": id })).collect();

    json!({
        "id": 135703,
        "name": "Seven Stars",
        "collectionConfiguration": {
            "collections": [
                { "name": "Parking", "id": 1, "sales": [] },
                { "name": "Festival Passes", "id": 2, "sales": refs }
            ]
        },
        "sales": sales
    })
}

/// An event page with `resale_items` elements marked `state="RESALE"`.
pub fn resale_page_html(resale_items: usize) -> String {
    let mut items = String::new();
    for i in 0..resale_items {
        items.push_str(&format!(
            "      <li class=\"ticket\" state=\"RESALE\" data-id=\"{}\">Resale ticket</li>\n",
            i + 1
        ));
    }
    format!(
        "<!doctype html>\n<html>\n  <body>\n    <h1>Seven Stars</h1>\n    <ul>\n      \
         <li class=\"ticket\" state=\"SOLD_OUT\">Festival Pass</li>\n{items}    </ul>\n  \
         </body>\n</html>\n"
    )
}
