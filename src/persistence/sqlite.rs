//! A subscriber registry backed by SQLite.

use std::{collections::BTreeSet, str::FromStr};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool, sqlite::SqliteConnectOptions};

use super::{error::PersistenceError, traits::SubscriberRegistry};
use crate::models::Subscriber;

/// SQL query constants for subscriber operations
mod subscriber_sql {
    pub const SELECT_IDS: &str = "SELECT id FROM subscribers ORDER BY id";

    pub const SELECT_SUBSCRIBERS: &str =
        "SELECT id, registered_at FROM subscribers ORDER BY id";

    pub const SELECT_ONE: &str = "SELECT 1 FROM subscribers WHERE id = ?";

    /// Ignoring the conflict keeps concurrent registrations idempotent.
    pub const INSERT_SUBSCRIBER: &str =
        "INSERT OR IGNORE INTO subscribers (id, registered_at) VALUES (?, ?)";

    pub const DELETE_SUBSCRIBER: &str = "DELETE FROM subscribers WHERE id = ?";
}

/// SQLite-backed [`SubscriberRegistry`]. Each statement is atomic, so several
/// processes may share the database.
pub struct SqliteSubscriberRegistry {
    pool: SqlitePool,
}

impl SqliteSubscriberRegistry {
    /// Connects to `database_url`, creating the database file if needed.
    #[tracing::instrument(level = "info")]
    pub async fn new(database_url: &str) -> Result<Self, PersistenceError> {
        tracing::debug!(database_url, "Attempting to connect to SQLite database.");
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        tracing::info!(database_url, "Successfully connected to SQLite database.");
        Ok(Self { pool })
    }

    /// Runs database migrations.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn run_migrations(&self) -> Result<(), PersistenceError> {
        sqlx::migrate!("./migrations").run(&self.pool).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to run database migrations.");
            e
        })?;
        tracing::debug!("Database migrations completed successfully.");
        Ok(())
    }

    async fn logged<F, T>(&self, operation: &str, query: F) -> Result<T, PersistenceError>
    where
        F: std::future::Future<Output = Result<T, sqlx::Error>>,
    {
        query.await.map_err(|e| {
            tracing::error!(error = %e, operation, "Database operation failed.");
            PersistenceError::from(e)
        })
    }
}

#[async_trait]
impl SubscriberRegistry for SqliteSubscriberRegistry {
    async fn list(&self) -> Result<BTreeSet<String>, PersistenceError> {
        let rows = self
            .logged(
                "list subscribers",
                sqlx::query(subscriber_sql::SELECT_IDS).fetch_all(&self.pool),
            )
            .await?;
        rows.iter().map(|row| row.try_get::<String, _>("id").map_err(Into::into)).collect()
    }

    async fn subscribers(&self) -> Result<Vec<Subscriber>, PersistenceError> {
        let rows = self
            .logged(
                "load subscribers",
                sqlx::query(subscriber_sql::SELECT_SUBSCRIBERS).fetch_all(&self.pool),
            )
            .await?;
        rows.iter()
            .map(|row| -> Result<Subscriber, PersistenceError> {
                Ok(Subscriber {
                    id: row.try_get("id")?,
                    registered_at: row.try_get::<Option<DateTime<Utc>>, _>("registered_at")?,
                })
            })
            .collect()
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn add(&self, id: &str) -> Result<bool, PersistenceError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(PersistenceError::InvalidInput("empty subscriber id".into()));
        }
        let result = self
            .logged(
                "insert subscriber",
                sqlx::query(subscriber_sql::INSERT_SUBSCRIBER)
                    .bind(id)
                    .bind(Utc::now())
                    .execute(&self.pool),
            )
            .await?;
        let added = result.rows_affected() == 1;
        if added {
            tracing::info!(id, "Subscriber registered.");
        }
        Ok(added)
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn remove(&self, id: &str) -> Result<bool, PersistenceError> {
        let result = self
            .logged(
                "delete subscriber",
                sqlx::query(subscriber_sql::DELETE_SUBSCRIBER).bind(id.trim()).execute(&self.pool),
            )
            .await?;
        let removed = result.rows_affected() == 1;
        if removed {
            tracing::info!(id, "Subscriber unregistered.");
        }
        Ok(removed)
    }

    async fn contains(&self, id: &str) -> Result<bool, PersistenceError> {
        let row = self
            .logged(
                "query subscriber",
                sqlx::query(subscriber_sql::SELECT_ONE).bind(id.trim()).fetch_optional(&self.pool),
            )
            .await?;
        Ok(row.is_some())
    }
}
