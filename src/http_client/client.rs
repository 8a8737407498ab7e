//! Construction of the provider HTTP clients: a plain `reqwest` client sized
//! by [`BaseHttpClientConfig`], wrapped in transient-error retry middleware.

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{Jitter, RetryTransientMiddleware, policies::ExponentialBackoff};

use super::HttpClientPoolError;
use crate::config::{BaseHttpClientConfig, HttpRetryConfig, JitterSetting};

/// Builds the underlying client shared by all retry policies of a pool.
pub fn build_base_client(config: &BaseHttpClientConfig) -> Result<reqwest::Client, HttpClientPoolError> {
    reqwest::Client::builder()
        .pool_max_idle_per_host(config.max_idle_per_host)
        .pool_idle_timeout(Some(config.idle_timeout))
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .build()
        .map_err(|e| HttpClientPoolError::HttpClientBuildError(e.to_string()))
}

/// Wraps `base_client` so that timeouts, connection failures and 5xx/429
/// answers are retried with exponential backoff.
pub fn create_retryable_http_client(
    config: &HttpRetryConfig,
    base_client: reqwest::Client,
) -> ClientWithMiddleware {
    let policy_builder = match config.jitter {
        JitterSetting::None => ExponentialBackoff::builder().jitter(Jitter::None),
        JitterSetting::Full => ExponentialBackoff::builder().jitter(Jitter::Full),
    };

    let retry_policy = policy_builder
        .base(config.base_for_backoff)
        .retry_bounds(config.initial_backoff_ms, config.max_backoff_secs)
        .build_with_max_retries(config.max_retries);

    ClientBuilder::new(base_client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build()
}
