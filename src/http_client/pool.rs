//! A shared pool of provider HTTP clients, one per retry policy.

use std::{collections::HashMap, sync::Arc};

use reqwest_middleware::ClientWithMiddleware;
use thiserror::Error;
use tokio::sync::RwLock;

use super::client::{build_base_client, create_retryable_http_client};
use crate::config::{BaseHttpClientConfig, HttpRetryConfig};

/// Errors that can occur within the `HttpClientPool`.
#[derive(Debug, Error)]
pub enum HttpClientPoolError {
    /// An error occurred while building the underlying `reqwest::Client`.
    #[error("Failed to create HTTP client: {0}")]
    HttpClientBuildError(String),
}

/// Hands out retrying clients to the notification channels.
///
/// Clients are keyed by their `HttpRetryConfig`, so channels sharing a retry
/// policy also share connections.
pub struct HttpClientPool {
    base_config: BaseHttpClientConfig,
    clients: Arc<RwLock<HashMap<String, Arc<ClientWithMiddleware>>>>,
}

impl HttpClientPool {
    /// Creates an empty pool whose clients use `base_config`.
    pub fn new(base_config: BaseHttpClientConfig) -> Self {
        Self { base_config, clients: Arc::new(RwLock::new(HashMap::new())) }
    }

    /// Returns the client for `retry_policy`, creating it on first use.
    pub async fn get_or_create(
        &self,
        retry_policy: &HttpRetryConfig,
    ) -> Result<Arc<ClientWithMiddleware>, HttpClientPoolError> {
        let key = format!("{retry_policy:?}");

        if let Some(client) = self.clients.read().await.get(&key) {
            return Ok(client.clone());
        }

        let mut clients = self.clients.write().await;
        // Another task may have created it while we waited for the write lock.
        if let Some(client) = clients.get(&key) {
            return Ok(client.clone());
        }

        let base_client = build_base_client(&self.base_config)?;
        let new_client = Arc::new(create_retryable_http_client(retry_policy, base_client));
        clients.insert(key, new_client.clone());
        tracing::debug!(pooled = clients.len(), "Created provider HTTP client.");

        Ok(new_client)
    }

    /// Returns the number of active HTTP clients in the pool.
    #[cfg(test)]
    pub async fn get_active_client_count(&self) -> usize {
        self.clients.read().await.len()
    }
}

impl Default for HttpClientPool {
    fn default() -> Self {
        Self::new(BaseHttpClientConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pool_returns_same_client_for_same_policy() {
        let pool = HttpClientPool::default();
        assert_eq!(pool.get_active_client_count().await, 0);

        let retry_config = HttpRetryConfig::default();
        let client1 = pool.get_or_create(&retry_config).await.unwrap();
        let client2 = pool.get_or_create(&retry_config).await.unwrap();

        assert!(Arc::ptr_eq(&client1, &client2));
        assert_eq!(pool.get_active_client_count().await, 1);
    }

    #[tokio::test]
    async fn test_pool_separates_policies() {
        let pool = HttpClientPool::new(BaseHttpClientConfig::default());

        let default_policy = HttpRetryConfig::default();
        let patient_policy = HttpRetryConfig { max_retries: 5, ..Default::default() };

        let client1 = pool.get_or_create(&default_policy).await.unwrap();
        let client2 = pool.get_or_create(&patient_policy).await.unwrap();

        assert!(!Arc::ptr_eq(&client1, &client2));
        assert_eq!(pool.get_active_client_count().await, 2);
    }

    #[tokio::test]
    async fn test_pool_concurrent_access() {
        let pool = Arc::new(HttpClientPool::default());
        let retry_config = HttpRetryConfig::default();

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let pool = Arc::clone(&pool);
                let retry_config = retry_config.clone();
                tokio::spawn(async move { pool.get_or_create(&retry_config).await.is_ok() })
            })
            .collect();

        for result in futures::future::join_all(tasks).await {
            assert!(result.unwrap());
        }
        assert_eq!(pool.get_active_client_count().await, 1);
    }
}
