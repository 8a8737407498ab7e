//! The subscriber registry interface.

use std::collections::BTreeSet;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::error::PersistenceError;
use crate::models::Subscriber;

/// A durable, duplicate-free set of chat subscriber identifiers.
///
/// Every mutation is persisted before the method returns. `add` and `remove`
/// are idempotent and report whether they changed anything.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SubscriberRegistry: Send + Sync {
    /// All registered identifiers.
    async fn list(&self) -> Result<BTreeSet<String>, PersistenceError>;

    /// All subscribers with their registration time, ordered by id.
    async fn subscribers(&self) -> Result<Vec<Subscriber>, PersistenceError>;

    /// Registers `id`. Returns `false` if it was already registered.
    async fn add(&self, id: &str) -> Result<bool, PersistenceError>;

    /// Unregisters `id`. Returns `false` if it was not registered.
    async fn remove(&self, id: &str) -> Result<bool, PersistenceError>;

    /// Whether `id` is registered.
    async fn contains(&self, id: &str) -> Result<bool, PersistenceError>;
}
