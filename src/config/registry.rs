use std::path::PathBuf;

use serde::Deserialize;

fn default_registry_path() -> PathBuf {
    PathBuf::from("chat_ids.txt")
}

/// Where the chat subscriber list lives.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum RegistryConfig {
    /// A plain text file with one chat id per line.
    File {
        /// Path of the file. A missing file is an empty registry.
        #[serde(default = "default_registry_path")]
        path: PathBuf,
    },
    /// A SQLite database, e.g. `sqlite:data/subscribers.db`.
    Sqlite {
        /// Connection URL passed to `sqlx`.
        database_url: String,
    },
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig::File { path: default_registry_path() }
    }
}
