//! This module contains the error types for the persistence layer.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the persistence layer.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Reading or writing the registry file failed.
    #[error("Registry file operation on {path} failed: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A database operation failed.
    #[error("A data store operation failed: {0}")]
    OperationFailed(#[from] sqlx::Error),

    /// An error occurred during a database migration.
    #[error("A data migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// An invalid identifier or configuration was provided.
    #[error("An invalid configuration or input was provided: {0}")]
    InvalidInput(String),
}

impl PersistenceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PersistenceError::Io { path: path.into(), source }
    }
}
