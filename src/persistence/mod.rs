//! Storage of the chat subscriber list.

pub mod error;
pub mod file;
pub mod sqlite;
pub mod traits;

use std::sync::Arc;

pub use error::PersistenceError;
pub use file::FileSubscriberRegistry;
pub use sqlite::SqliteSubscriberRegistry;
pub use traits::SubscriberRegistry;

use crate::config::RegistryConfig;

/// Opens the configured registry backend, running migrations for SQLite.
pub async fn open_registry(
    config: &RegistryConfig,
) -> Result<Arc<dyn SubscriberRegistry>, PersistenceError> {
    match config {
        RegistryConfig::File { path } => {
            tracing::info!(path = %path.display(), "Using file subscriber registry.");
            Ok(Arc::new(FileSubscriberRegistry::new(path)))
        }
        RegistryConfig::Sqlite { database_url } => {
            let registry = SqliteSubscriberRegistry::new(database_url).await?;
            registry.run_migrations().await?;
            Ok(Arc::new(registry))
        }
    }
}
