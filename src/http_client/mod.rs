//! HTTP plumbing: the cookie session used against the ticketing site and a
//! pool of retrying clients for the notification providers.

mod client;
mod pool;
mod session;

pub use client::{build_base_client, create_retryable_http_client};
pub use pool::{HttpClientPool, HttpClientPoolError};
pub use session::HttpSession;
