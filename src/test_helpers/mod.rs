//! A set of helpers for testing

mod event;
mod http_client;
mod payload;
mod registry;

pub use event::{test_config, test_event};
pub use http_client::{create_test_http_client, get_http_client_from_http_pool};
pub use payload::{event_document, resale_page_html};
pub use registry::InMemoryRegistry;
