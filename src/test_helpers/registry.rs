//! A subscriber registry kept in memory.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    models::Subscriber,
    persistence::{PersistenceError, SubscriberRegistry},
};

/// An in-memory [`SubscriberRegistry`] for tests that need real semantics
/// rather than mock expectations.
#[derive(Default)]
pub struct InMemoryRegistry {
    entries: Mutex<BTreeMap<String, Subscriber>>,
}

impl InMemoryRegistry {
    /// A registry pre-populated with `ids`.
    pub fn with_ids(ids: &[&str]) -> Self {
        let entries = ids.iter().map(|id| (id.to_string(), Subscriber::registered_now(*id))).collect();
        Self { entries: Mutex::new(entries) }
    }
}

#[async_trait]
impl SubscriberRegistry for InMemoryRegistry {
    async fn list(&self) -> Result<BTreeSet<String>, PersistenceError> {
        Ok(self.entries.lock().await.keys().cloned().collect())
    }

    async fn subscribers(&self) -> Result<Vec<Subscriber>, PersistenceError> {
        Ok(self.entries.lock().await.values().cloned().collect())
    }

    async fn add(&self, id: &str) -> Result<bool, PersistenceError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(PersistenceError::InvalidInput("empty subscriber id".into()));
        }
        let mut entries = self.entries.lock().await;
        if entries.contains_key(id) {
            return Ok(false);
        }
        entries.insert(id.to_string(), Subscriber::registered_now(id));
        Ok(true)
    }

    async fn remove(&self, id: &str) -> Result<bool, PersistenceError> {
        Ok(self.entries.lock().await.remove(id.trim()).is_some())
    }

    async fn contains(&self, id: &str) -> Result<bool, PersistenceError> {
        Ok(self.entries.lock().await.contains_key(id.trim()))
    }
}
